//! Project hierarchy: projects, WBS nodes and tasks, plus the drafts used
//! to create and edit them.

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

const CODE_MAX: usize = 50;
const NAME_MAX: usize = 200;
const UNIT_MAX: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: u64,
    #[serde(default)]
    pub project_code: Option<String>,
    #[serde(alias = "projectName")]
    pub name: String,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A node of the work breakdown structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wbs {
    pub wbs_id: u64,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub parent_wbs_id: Option<u64>,
    #[serde(default)]
    pub wbs_code: Option<String>,
    pub wbs_name: String,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub children: Vec<Wbs>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: u64,
    #[serde(default)]
    pub wbs_id: Option<u64>,
    #[serde(default)]
    pub task_code: Option<String>,
    pub task_name: String,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub planned_qty: Option<Decimal>,
    #[serde(default)]
    pub actual_qty: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Create/update payload for a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub project_code: String,
    pub project_name: String,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<String>,
    #[serde(rename = "activateFlag")]
    pub active: bool,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<()> {
        required("projectCode", "Project code", &self.project_code, CODE_MAX)?;
        required("projectName", "Project name", &self.project_name, NAME_MAX)?;
        ordered(self.start_date, self.end_date)
    }
}

/// Create/update payload for a WBS node. A node without a parent is a root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WbsDraft {
    pub project_id: u64,
    pub parent_wbs_id: Option<u64>,
    pub wbs_code: String,
    pub wbs_name: String,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub planned_qty: Option<Decimal>,
}

impl WbsDraft {
    pub fn validate(&self) -> Result<()> {
        required("wbsCode", "WBS code", &self.wbs_code, CODE_MAX)?;
        required("wbsName", "WBS name", &self.wbs_name, NAME_MAX)?;
        if self.parent_wbs_id == Some(0) {
            return Err(ConsoleError::validation("parentWbsId")
                .with_reason("Parent WBS ID must be positive"));
        }
        non_negative("plannedQty", self.planned_qty)?;
        ordered(self.start_date, self.end_date)
    }
}

/// Create/update payload for a task. Both the project and the WBS node it
/// belongs to are required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub project_id: u64,
    pub wbs_id: u64,
    pub task_code: String,
    pub task_name: String,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub planned_qty: Option<Decimal>,
    pub unit: Option<String>,
}

impl TaskDraft {
    pub fn validate(&self) -> Result<()> {
        required("taskCode", "Task code", &self.task_code, CODE_MAX)?;
        required("taskName", "Task name", &self.task_name, NAME_MAX)?;
        if let Some(unit) = &self.unit {
            if unit.chars().count() > UNIT_MAX {
                return Err(ConsoleError::validation("unit")
                    .with_reason(format!("Unit must not exceed {UNIT_MAX} characters")));
            }
        }
        non_negative("plannedQty", self.planned_qty)?;
        ordered(self.start_date, self.end_date)
    }
}

fn required(field: &str, label: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConsoleError::validation(field).with_reason(format!("{label} is required")));
    }
    if value.chars().count() > max {
        return Err(ConsoleError::validation(field)
            .with_reason(format!("{label} must not exceed {max} characters")));
    }
    Ok(())
}

fn non_negative(field: &str, value: Option<Decimal>) -> Result<()> {
    if value.is_some_and(|v| v < Decimal::ZERO) {
        return Err(ConsoleError::validation(field).with_reason("Quantity must not be negative"));
    }
    Ok(())
}

fn ordered(start: Option<Date>, end: Option<Date>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ConsoleError::validation("endDate")
            .with_reason("End date must be on or after start date")),
        _ => Ok(()),
    }
}

fn date_range(start: Option<Date>, end: Option<Date>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{s} → {e}"),
        (Some(s), None) => format!("from {s}"),
        (None, Some(e)) => format!("until {e}"),
        (None, None) => "-".to_string(),
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} |",
            self.project_id,
            self.name,
            date_range(self.start_date, self.end_date),
            self.status.as_deref().unwrap_or("-")
        )
    }
}

impl Wbs {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{}- {} {} ({}) [id {}]",
            "  ".repeat(depth),
            self.wbs_code.as_deref().unwrap_or(""),
            self.wbs_name,
            date_range(self.start_date, self.end_date),
            self.wbs_id
        )?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Wbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.task_id, self.task_name)?;
        writeln!(f)?;
        if let Some(code) = &self.task_code {
            writeln!(f, "**Code:** {code}")?;
        }
        writeln!(f, "**Dates:** {}", date_range(self.start_date, self.end_date))?;
        if let Some(planned) = self.planned_qty {
            writeln!(
                f,
                "**Planned:** {planned:.2} {}",
                self.unit.as_deref().unwrap_or("")
            )?;
        }
        if let Some(actual) = self.actual_qty {
            writeln!(f, "**Actual:** {actual:.2}")?;
        }
        Ok(())
    }
}
