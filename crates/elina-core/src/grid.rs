//! Day-wise reconciliation grid.
//!
//! Holds an in-memory copy of a task's day-wise rows, applies edits to the
//! rows that may change, blocks over-plan batches locally and submits the
//! rest in one request. A successful submit always refetches; the copy is
//! never patched in place.
//!
//! ```text
//! Loading ──▶ Ready ──▶ Editing / BulkSelecting ──▶ Submitting ──▶ Loading ──▶ Ready
//!    │          ▲                                       │
//!    ▼          └────────── failure or violation ───────┘
//!  Failed
//! ```

use std::{collections::BTreeSet, fmt};

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::{
    console::Console,
    error::{ConsoleError, Result},
    models::{BusinessRuleViolation, DayWiseBatch, DayWiseUpdateRow},
    params::Id,
    violation::ViolationDisplay,
};

/// Where a grid is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridState {
    Loading,
    Ready,
    Editing,
    BulkSelecting,
    Submitting,
    /// Rows could not be loaded; `load` again to retry
    Failed(String),
}

/// A single cell change.
#[derive(Debug, Clone, PartialEq)]
pub enum CellEdit {
    ActualQty(Decimal),
    Remarks(Option<String>),
}

/// Result of [`DayWiseGrid::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The batch was accepted and the rows refetched
    Saved { entries: usize },
    /// The local over-plan guard or the backend rejected the batch; edits
    /// are kept
    Violation(BusinessRuleViolation),
}

/// A row deletion awaiting the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    update_id: u64,
}

impl PendingDelete {
    pub fn update_id(&self) -> u64 {
        self.update_id
    }
}

/// Grid view model for one task.
#[derive(Debug, Clone)]
pub struct DayWiseGrid {
    task_id: u64,
    rows: Vec<DayWiseUpdateRow>,
    state: GridState,
    selection: BTreeSet<usize>,
    violation: ViolationDisplay,
    error: Option<String>,
}

impl DayWiseGrid {
    /// Creates an empty grid in `Loading`. Call [`load`](Self::load) next.
    pub fn new(task_id: u64) -> Self {
        Self {
            task_id,
            rows: Vec::new(),
            state: GridState::Loading,
            selection: BTreeSet::new(),
            violation: ViolationDisplay::new(),
            error: None,
        }
    }

    /// Builds a grid over rows that are already loaded.
    pub fn with_rows(task_id: u64, rows: Vec<DayWiseUpdateRow>) -> Self {
        Self {
            rows,
            state: GridState::Ready,
            ..Self::new(task_id)
        }
    }

    pub fn task_id(&self) -> u64 {
        self.task_id
    }

    pub fn rows(&self) -> &[DayWiseUpdateRow] {
        &self.rows
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn selection(&self) -> impl Iterator<Item = usize> + '_ {
        self.selection.iter().copied()
    }

    /// The local violation display (over-plan guard).
    pub fn violation(&self) -> &ViolationDisplay {
        &self.violation
    }

    pub fn dismiss_violation(&mut self) -> Option<BusinessRuleViolation> {
        self.violation.dismiss()
    }

    /// Inline error from the last failed action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches every row of the task. On failure no partial row set is
    /// kept.
    pub async fn load(&mut self, console: &Console) -> Result<()> {
        self.state = GridState::Loading;
        self.selection.clear();
        match console.day_wise_rows(&Id { id: self.task_id }).await {
            Ok(rows) => {
                debug!("Loaded {} day-wise row(s) for task {}", rows.len(), self.task_id);
                self.rows = rows;
                self.state = GridState::Ready;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.rows.clear();
                self.state = GridState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Applies `edit` to row `index`.
    ///
    /// Returns `Ok(false)` without touching anything when the grid is not in
    /// `Ready`/`Editing` or the row is locked or restricted.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` for a negative quantity.
    pub fn edit_cell(&mut self, index: usize, edit: CellEdit) -> Result<bool> {
        if !matches!(self.state, GridState::Ready | GridState::Editing) {
            return Ok(false);
        }
        let Some(row) = self.rows.get_mut(index).filter(|row| row.is_editable()) else {
            return Ok(false);
        };
        match edit {
            CellEdit::ActualQty(value) => {
                ensure_non_negative(value)?;
                row.set_actual_qty(value);
            }
            CellEdit::Remarks(remarks) => row.set_remarks(remarks),
        }
        self.state = GridState::Editing;
        Ok(true)
    }

    /// Enters bulk-selection mode.
    pub fn begin_bulk_selection(&mut self) -> bool {
        if !matches!(self.state, GridState::Ready | GridState::Editing) {
            return false;
        }
        self.state = GridState::BulkSelecting;
        true
    }

    /// Leaves bulk-selection mode without applying anything.
    pub fn cancel_bulk_selection(&mut self) {
        if self.state == GridState::BulkSelecting {
            self.selection.clear();
            self.state = GridState::Editing;
        }
    }

    /// Adds or removes row `index` from the selection. Only editable rows
    /// can be selected. Returns whether the row is now selected.
    pub fn toggle_selection(&mut self, index: usize) -> bool {
        if self.state != GridState::BulkSelecting {
            return false;
        }
        if !self.rows.get(index).is_some_and(DayWiseUpdateRow::is_editable) {
            return false;
        }
        if self.selection.remove(&index) {
            false
        } else {
            self.selection.insert(index)
        }
    }

    /// Writes `value` into the actual quantity of every editable row among
    /// `indices`. Locked, restricted and out-of-range indices are skipped.
    /// Returns how many rows changed.
    pub fn bulk_apply(&mut self, indices: &[usize], value: Decimal) -> Result<usize> {
        ensure_non_negative(value)?;
        if !matches!(
            self.state,
            GridState::Ready | GridState::Editing | GridState::BulkSelecting
        ) {
            return Ok(0);
        }

        let targets: BTreeSet<usize> = indices.iter().copied().collect();
        let mut applied = 0;
        for index in targets {
            if let Some(row) = self.rows.get_mut(index).filter(|row| row.is_editable()) {
                row.set_actual_qty(value);
                applied += 1;
            }
        }
        if applied > 0 {
            self.state = GridState::Editing;
        }
        Ok(applied)
    }

    /// Applies `value` to the current selection, then clears it and leaves
    /// bulk mode.
    pub fn apply_to_selection(&mut self, value: Decimal) -> Result<usize> {
        if self.state != GridState::BulkSelecting {
            return Ok(0);
        }
        let indices: Vec<usize> = self.selection.iter().copied().collect();
        let applied = self.bulk_apply(&indices, value)?;
        self.selection.clear();
        self.state = GridState::Editing;
        Ok(applied)
    }

    /// Number of editable rows whose actual exceeds the plan.
    pub fn over_plan_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.is_editable() && row.exceeds_plan())
            .count()
    }

    /// Entries that would be sent by [`submit`](Self::submit).
    pub fn pending_batch(&self) -> DayWiseBatch {
        DayWiseBatch {
            task_id: self.task_id,
            updates: self.rows.iter().filter_map(DayWiseUpdateRow::to_entry).collect(),
        }
    }

    /// Runs the over-plan guard, sends the batch and refetches.
    ///
    /// A guard failure never reaches the network; it is shown on the local
    /// violation display. A backend violation has already gone out on the
    /// violation channel. Either way the edits stay in the grid.
    pub async fn submit(&mut self, console: &Console) -> Result<SubmitOutcome> {
        if !matches!(self.state, GridState::Ready | GridState::Editing) {
            return Err(ConsoleError::validation("grid")
                .with_reason("Submit is only available while the grid is idle"));
        }

        let offending = self.over_plan_count();
        if offending > 0 {
            let violation = BusinessRuleViolation::actual_exceeds_planned(offending);
            warn!("Submit blocked locally: {violation}");
            self.violation.show(violation.clone());
            return Ok(SubmitOutcome::Violation(violation));
        }

        let batch = self.pending_batch();
        let entries = batch.updates.len();
        let resume = self.state.clone();
        self.state = GridState::Submitting;
        self.error = None;

        match console.save_day_wise(&batch).await {
            Ok(()) => {
                self.load(console).await?;
                Ok(SubmitOutcome::Saved { entries })
            }
            Err(ConsoleError::RuleViolation(violation)) => {
                self.state = resume;
                Ok(SubmitOutcome::Violation(violation))
            }
            Err(e) => {
                self.state = resume;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// First step of a deletion: finds the stored row for `update_id`.
    /// Nothing is removed until [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&self, update_id: u64) -> Option<PendingDelete> {
        self.rows
            .iter()
            .any(|row| row.update_id() == Some(update_id))
            .then_some(PendingDelete { update_id })
    }

    /// Deletes the confirmed row on the backend and drops it locally. On a
    /// violation the row stays.
    pub async fn confirm_delete(
        &mut self,
        console: &Console,
        pending: PendingDelete,
    ) -> Result<Option<BusinessRuleViolation>> {
        match console
            .delete_task_update(&Id {
                id: pending.update_id,
            })
            .await
        {
            Ok(()) => {
                self.rows
                    .retain(|row| row.update_id() != Some(pending.update_id));
                self.selection.clear();
                Ok(None)
            }
            Err(ConsoleError::RuleViolation(violation)) => Ok(Some(violation)),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

fn ensure_non_negative(value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(ConsoleError::validation("actualQty").with_reason("must not be negative"));
    }
    Ok(())
}

impl fmt::Display for DayWiseGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Day-wise updates: task {}", self.task_id)?;
        writeln!(f)?;
        if let GridState::Failed(message) = &self.state {
            return writeln!(f, "Failed to load rows: {message}");
        }
        if self.rows.is_empty() {
            return writeln!(f, "No planned dates.");
        }
        writeln!(f, "| # | Date | Planned | Actual | Variance | Remarks | Status |")?;
        writeln!(f, "|---|------|---------|--------|----------|---------|--------|")?;
        for (index, row) in self.rows.iter().enumerate() {
            let marker = if self.selection.contains(&index) { "*" } else { "" };
            writeln!(f, "| {marker}{index} {row}")?;
        }
        if let Some(error) = &self.error {
            writeln!(f)?;
            writeln!(f, "**Error:** {error}")?;
        }
        Ok(())
    }
}
