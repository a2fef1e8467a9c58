//! Day-wise progress rows, the batch payload built from them and the
//! single-entry update and summary shapes.

use std::{cmp::Ordering, fmt};

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{null_as_default, null_as_true};
use crate::error::{ConsoleError, Result};

/// One calendar date's planned/actual record for a task.
///
/// Planned quantity, lock state and edit permission come from the backend
/// and cannot be changed from outside the crate. Actual quantity and remarks
/// are only mutated through [`crate::grid::DayWiseGrid`], which refuses to
/// touch locked or restricted rows. Variance is always derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayWiseUpdateRow {
    #[serde(rename = "updateDate")]
    date: Date,
    #[serde(rename = "planQty", default, deserialize_with = "null_as_default")]
    planned_qty: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    actual_qty: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remarks: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    is_locked: bool,
    #[serde(default = "super::default_true", deserialize_with = "null_as_true")]
    can_edit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    update_id: Option<u64>,
}

impl DayWiseUpdateRow {
    /// Creates an editable row with no server record.
    pub fn new(date: Date, planned_qty: Decimal, actual_qty: Decimal) -> Self {
        Self {
            date,
            planned_qty,
            actual_qty,
            remarks: None,
            is_locked: false,
            can_edit: true,
            update_id: None,
        }
    }

    /// Marks the row as covered by a confirmation freeze.
    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    /// Marks the row as not editable for the current user.
    pub fn restricted(mut self) -> Self {
        self.can_edit = false;
        self
    }

    /// Attaches the id of an existing server record.
    pub fn with_update_id(mut self, update_id: u64) -> Self {
        self.update_id = Some(update_id);
        self
    }

    /// Attaches remarks.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn planned_qty(&self) -> Decimal {
        self.planned_qty
    }

    pub fn actual_qty(&self) -> Decimal {
        self.actual_qty
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    pub fn update_id(&self) -> Option<u64> {
        self.update_id
    }

    /// Actual minus planned. Negative means under plan.
    pub fn variance(&self) -> Decimal {
        self.actual_qty - self.planned_qty
    }

    /// True when client actions may change this row.
    pub fn is_editable(&self) -> bool {
        self.can_edit && !self.is_locked
    }

    /// True when the row would be rejected by the over-plan guard.
    pub fn exceeds_plan(&self) -> bool {
        self.actual_qty > self.planned_qty
    }

    pub fn status(&self) -> RowStatus {
        if self.is_locked {
            RowStatus::Locked
        } else if !self.can_edit {
            RowStatus::Restricted
        } else {
            RowStatus::Editable
        }
    }

    pub fn variance_kind(&self) -> VarianceKind {
        match self.variance().cmp(&Decimal::ZERO) {
            Ordering::Greater => VarianceKind::Over,
            Ordering::Less => VarianceKind::Under,
            Ordering::Equal => VarianceKind::OnPlan,
        }
    }

    pub(crate) fn set_actual_qty(&mut self, value: Decimal) {
        self.actual_qty = value;
    }

    pub(crate) fn set_remarks(&mut self, remarks: Option<String>) {
        self.remarks = remarks.filter(|r| !r.is_empty());
    }

    /// Converts the row into a batch entry, if it belongs in a submission.
    ///
    /// Only editable rows with a non-zero actual or an existing server record
    /// are submitted.
    pub fn to_entry(&self) -> Option<DayWiseEntry> {
        let has_content = self.actual_qty > Decimal::ZERO || self.update_id.is_some();
        (self.is_editable() && has_content).then(|| DayWiseEntry {
            update_date: self.date,
            plan_qty: self.planned_qty,
            actual_qty: self.actual_qty,
            remarks: self.remarks.clone(),
        })
    }
}

/// Edit state of a row as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Locked,
    Restricted,
    Editable,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RowStatus::Locked => "Locked",
            RowStatus::Restricted => "Restricted",
            RowStatus::Editable => "Editable",
        };
        write!(f, "{label}")
    }
}

/// Sign of a row's variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarianceKind {
    Over,
    Under,
    OnPlan,
}

/// One entry of a day-wise batch submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayWiseEntry {
    pub update_date: Date,
    pub plan_qty: Decimal,
    pub actual_qty: Decimal,
    pub remarks: Option<String>,
}

/// Batch payload for `POST /api/task-updates/task/{taskId}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayWiseBatch {
    pub task_id: u64,
    pub updates: Vec<DayWiseEntry>,
}

/// A stored progress entry for one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub update_id: u64,
    pub task_id: u64,
    pub update_date: Date,
    #[serde(default)]
    pub planned_qty: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actual_qty: Decimal,
    #[serde(default)]
    pub daily_update_qty: Option<Decimal>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Payload for `POST /api/task-updates`. The backend creates the entry for
/// `update_date` or replaces the existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateDraft {
    pub task_id: u64,
    pub update_date: Date,
    pub planned_qty: Option<Decimal>,
    pub actual_qty: Decimal,
    pub daily_update_qty: Option<Decimal>,
    pub remarks: Option<String>,
}

impl TaskUpdateDraft {
    pub fn validate(&self) -> Result<()> {
        if self.task_id == 0 {
            return Err(ConsoleError::validation("taskId").with_reason("Task ID is required"));
        }
        let negative = [
            ("actualQty", Some(self.actual_qty)),
            ("plannedQty", self.planned_qty),
            ("dailyUpdateQty", self.daily_update_qty),
        ]
        .into_iter()
        .find(|(_, qty)| qty.is_some_and(|q| q < Decimal::ZERO));
        match negative {
            Some((field, _)) => Err(ConsoleError::validation(field)
                .with_reason("Quantity must not be negative")),
            None => Ok(()),
        }
    }
}

/// Plan against actual for one date of a summary range. Variance is
/// computed by the backend as actual minus plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: Date,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_qty: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actual_qty: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variance: Decimal,
}

impl fmt::Display for DayWiseUpdateRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variance = self.variance();
        let sign = if variance > Decimal::ZERO { "+" } else { "" };
        write!(
            f,
            "| {} | {:.2} | {:.2} | {sign}{:.2} | {} | {} |",
            self.date,
            self.planned_qty,
            self.actual_qty,
            variance,
            self.remarks.as_deref().unwrap_or("-"),
            self.status()
        )
    }
}

impl fmt::Display for TaskUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Update {} ({})", self.update_id, self.update_date)?;
        writeln!(f)?;
        writeln!(f, "**Task:** {}", self.task_id)?;
        if let Some(planned) = self.planned_qty {
            writeln!(f, "**Planned:** {planned:.2}")?;
        }
        writeln!(f, "**Actual:** {:.2}", self.actual_qty)?;
        if let Some(remarks) = &self.remarks {
            writeln!(f, "**Remarks:** {remarks}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.variance > Decimal::ZERO { "+" } else { "" };
        write!(
            f,
            "| {} | {:.2} | {:.2} | {sign}{:.2} |",
            self.date, self.plan_qty, self.actual_qty, self.variance
        )
    }
}
