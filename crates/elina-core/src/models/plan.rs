//! Plan versions, their lines, creation payloads and comparison results.

use std::{collections::BTreeMap, fmt};

use jiff::civil::{Date, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// An immutable snapshot of planned quantities for a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanVersion {
    #[serde(rename = "planVersionId")]
    pub version_id: u64,
    pub task_id: u64,
    pub version_no: u32,
    pub version_date: Date,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<u64>,
    #[serde(default)]
    pub created_on: Option<DateTime>,
}

/// A committed plan line. There is no edit path for these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanLine {
    #[serde(default)]
    pub line_id: Option<u64>,
    #[serde(default)]
    pub line_number: Option<u32>,
    pub planned_date: Date,
    #[serde(default, deserialize_with = "null_as_default")]
    pub planned_qty: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// The three mutually exclusive ways of creating a version.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreationMode {
    DailyEntry,
    DateRangeSplit,
    SingleLineQuick,
}

/// How a date range is expanded into lines by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    EqualSplit,
    WeeklySplit,
    MonthlySplit,
    CustomSplit,
}

/// A manually entered line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLine {
    pub planned_date: Date,
    pub planned_qty: Decimal,
    pub description: Option<String>,
}

/// A date range the backend splits into lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeSplit {
    pub start_date: Date,
    pub end_date: Date,
    pub total_qty: Decimal,
    pub split_type: SplitType,
    /// Declared number of periods (custom split only)
    pub split_count: Option<u32>,
    /// One quantity per period (custom split only)
    pub custom_quantities: Option<Vec<Decimal>>,
}

/// Input for one of the three creation modes. Exactly one is sent per call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanCreation {
    DailyEntry(Vec<DailyLine>),
    DateRangeSplit(DateRangeSplit),
    SingleLineQuick(DailyLine),
}

impl PlanCreation {
    pub fn mode(&self) -> CreationMode {
        match self {
            PlanCreation::DailyEntry(_) => CreationMode::DailyEntry,
            PlanCreation::DateRangeSplit(_) => CreationMode::DateRangeSplit,
            PlanCreation::SingleLineQuick(_) => CreationMode::SingleLineQuick,
        }
    }
}

/// Comparison tag for one date across two versions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonStatus {
    Same,
    Increased,
    Decreased,
    New,
    Removed,
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComparisonStatus::Same => "SAME",
            ComparisonStatus::Increased => "INCREASED",
            ComparisonStatus::Decreased => "DECREASED",
            ComparisonStatus::New => "NEW",
            ComparisonStatus::Removed => "REMOVED",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonLine {
    pub planned_date: Date,
    #[serde(default)]
    pub qty_version1: Option<Decimal>,
    #[serde(default)]
    pub qty_version2: Option<Decimal>,
    #[serde(default)]
    pub difference: Option<Decimal>,
    pub status: ComparisonStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_days_version1: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_days_version2: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub common_days: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_days: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub removed_days: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_qty_version1: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_qty_version2: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_difference: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub change_statistics: BTreeMap<String, u32>,
}

/// Server-computed diff between two versions, rendered as received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionComparison {
    pub version1: PlanVersion,
    pub version2: PlanVersion,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comparison_lines: Vec<ComparisonLine>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: ComparisonSummary,
}

impl fmt::Display for PlanVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{} ({})", self.version_no, self.version_date)?;
        if self.is_active {
            write!(f, " **active**")?;
        }
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {:.2} | {} |",
            self.planned_date,
            self.planned_qty,
            self.description.as_deref().unwrap_or("-")
        )
    }
}

impl fmt::Display for VersionComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn qty(value: Option<Decimal>) -> String {
            value.map_or_else(|| "-".to_string(), |q| format!("{q:.2}"))
        }

        writeln!(f, "# Comparing {} with {}", self.version1, self.version2)?;
        writeln!(f)?;
        writeln!(f, "| Date | v{} | v{} | Difference | Status |", self.version1.version_no, self.version2.version_no)?;
        writeln!(f, "|---|---|---|---|---|")?;
        for line in &self.comparison_lines {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} |",
                line.planned_date,
                qty(line.qty_version1),
                qty(line.qty_version2),
                qty(line.difference),
                line.status
            )?;
        }
        writeln!(f)?;
        let summary = &self.summary;
        writeln!(
            f,
            "**Days:** {} vs {} ({} common, {} new, {} removed)",
            summary.total_days_version1,
            summary.total_days_version2,
            summary.common_days,
            summary.new_days,
            summary.removed_days
        )?;
        writeln!(
            f,
            "**Total quantity:** {:.2} vs {:.2} (difference {:.2})",
            summary.total_qty_version1, summary.total_qty_version2, summary.total_difference
        )?;
        for (status, count) in &summary.change_statistics {
            writeln!(f, "- {status}: {count}")?;
        }
        Ok(())
    }
}
