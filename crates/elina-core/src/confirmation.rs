//! WBS confirmation (freeze) workflow.
//!
//! Selecting a date previews the quantity a freeze would confirm. The user
//! then arms the freeze after seeing the date and quantity restated, and
//! only then is it committed. Undo is limited to the most recent entry and
//! to users holding the elevated permission.

use std::fmt;

use async_trait::async_trait;
use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::{
    console::{Console, PERMISSION_CONFIRM, PERMISSION_UNDO_CONFIRMATION},
    error::{ConsoleError, Result},
    models::{Confirmation, ConfirmationRequest, ConfirmationSummary},
    params::Id,
    staged::{CommitOutcome, StagePhase, StagedAction, StagedOperation},
};

/// Freezing one WBS as a staged operation.
#[derive(Debug, Clone, Copy)]
pub struct FreezeWbs {
    wbs_id: u64,
}

#[async_trait]
impl StagedOperation for FreezeWbs {
    type Input = ConfirmationRequest;
    type Preview = ConfirmationSummary;
    type Outcome = Confirmation;

    async fn preview(&self, console: &Console, input: &Self::Input) -> Result<Self::Preview> {
        console
            .confirmation_summary(&Id { id: self.wbs_id }, Some(input.confirmation_date))
            .await
    }

    async fn commit(&self, console: &Console, input: &Self::Input) -> Result<Self::Outcome> {
        console.confirm_wbs(&Id { id: self.wbs_id }, input).await
    }
}

/// How a lock date is presented relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockBanner {
    None,
    /// The lock date is in the past
    Informational(Date),
    /// The lock date is today or later and still blocks edits
    Blocking(Date),
}

impl LockBanner {
    pub fn for_lock_date(lock_date: Option<Date>, today: Date) -> Self {
        match lock_date {
            None => LockBanner::None,
            Some(date) if date >= today => LockBanner::Blocking(date),
            Some(date) => LockBanner::Informational(date),
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, LockBanner::Blocking(_))
    }
}

impl fmt::Display for LockBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockBanner::None => Ok(()),
            LockBanner::Informational(date) => {
                write!(f, "> Data is confirmed up to {date}.")
            }
            LockBanner::Blocking(date) => write!(
                f,
                "> **Locked:** updates on or before {date} are blocked by a confirmation."
            ),
        }
    }
}

/// What the user is asked to agree to before a freeze is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct FreezePrompt {
    pub wbs_id: u64,
    pub confirmation_date: Date,
    pub quantity: Decimal,
}

impl fmt::Display for FreezePrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Confirm WBS {} up to {}? {:.2} will be frozen. This cannot be edited afterwards.",
            self.wbs_id, self.confirmation_date, self.quantity
        )
    }
}

/// Confirmation view model for one WBS.
#[derive(Debug)]
pub struct ConfirmationWorkflow {
    wbs_id: u64,
    today: Date,
    summary: Option<ConfirmationSummary>,
    history: Vec<Confirmation>,
    freeze: StagedAction<FreezeWbs>,
}

impl ConfirmationWorkflow {
    pub fn new(wbs_id: u64, today: Date) -> Self {
        Self {
            wbs_id,
            today,
            summary: None,
            history: Vec::new(),
            freeze: StagedAction::new(FreezeWbs { wbs_id }),
        }
    }

    pub fn wbs_id(&self) -> u64 {
        self.wbs_id
    }

    pub fn summary(&self) -> Option<&ConfirmationSummary> {
        self.summary.as_ref()
    }

    pub fn history(&self) -> &[Confirmation] {
        &self.history
    }

    pub fn phase(&self) -> StagePhase {
        self.freeze.phase()
    }

    /// The previewed summary for the selected date, if any.
    pub fn preview(&self) -> Option<&ConfirmationSummary> {
        self.freeze.preview()
    }

    pub fn lock_banner(&self) -> LockBanner {
        LockBanner::for_lock_date(self.summary.as_ref().and_then(|s| s.lock_date), self.today)
    }

    /// Most recent confirmation, the only one that may be undone.
    pub fn latest(&self) -> Option<&Confirmation> {
        self.history
            .iter()
            .max_by_key(|c| (c.confirmation_date, c.created_on, c.confirmation_id))
    }

    /// Fetches the summary and history.
    pub async fn load(&mut self, console: &Console) -> Result<()> {
        let wbs = Id { id: self.wbs_id };
        self.summary = Some(console.confirmation_summary(&wbs, None).await?);
        self.history = console.confirmation_history(&wbs).await?;
        Ok(())
    }

    /// Previews a freeze on `date`. Creates nothing.
    pub async fn select_date(
        &mut self,
        console: &Console,
        date: Date,
        remarks: Option<String>,
    ) -> Result<&ConfirmationSummary> {
        self.freeze
            .stage(
                console,
                ConfirmationRequest {
                    confirmation_date: date,
                    remarks,
                },
            )
            .await
    }

    /// Second step: restates the previewed date and quantity.
    pub fn arm(&mut self) -> Result<FreezePrompt> {
        let date = self
            .freeze
            .input()
            .map(|input| input.confirmation_date)
            .ok_or_else(|| {
                ConsoleError::validation("confirmationDate").with_reason("select a date first")
            })?;
        let preview = self.freeze.arm()?;
        Ok(FreezePrompt {
            wbs_id: self.wbs_id,
            confirmation_date: date,
            quantity: preview.preview_actual_qty.unwrap_or(preview.actual_qty),
        })
    }

    pub fn cancel(&mut self) {
        self.freeze.disarm();
    }

    /// Sends the armed freeze. On success the summary and history are
    /// refetched; on a violation the selection is kept.
    pub async fn commit(&mut self, console: &Console) -> Result<CommitOutcome<Confirmation>> {
        let outcome = self.freeze.commit(console).await?;
        if let CommitOutcome::Committed(_) = &outcome {
            self.freeze.reset();
            self.load(console).await?;
        }
        Ok(outcome)
    }

    pub async fn can_confirm(&self, console: &Console) -> Result<bool> {
        console.has_permission(PERMISSION_CONFIRM).await
    }

    pub async fn can_undo(&self, console: &Console) -> Result<bool> {
        console.has_permission(PERMISSION_UNDO_CONFIRMATION).await
    }

    /// Undoes the latest confirmation and refetches.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` when `confirmation_id` is not the
    /// latest entry and `ConsoleError::AuthorizationDenied` without the
    /// elevated permission.
    pub async fn undo(&mut self, console: &Console, confirmation_id: u64) -> Result<()> {
        if self.latest().map(|c| c.confirmation_id) != Some(confirmation_id) {
            return Err(ConsoleError::validation("confirmationId")
                .with_reason("only the most recent confirmation can be undone"));
        }
        console
            .undo_confirmation(&Id {
                id: confirmation_id,
            })
            .await?;
        self.load(console).await
    }
}

impl fmt::Display for ConfirmationWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(summary) => write!(f, "{summary}")?,
            None => writeln!(f, "# Confirmations: WBS {}", self.wbs_id)?,
        }
        let banner = self.lock_banner();
        if banner != LockBanner::None {
            writeln!(f)?;
            writeln!(f, "{banner}")?;
        }
        writeln!(f)?;
        writeln!(f, "## History")?;
        writeln!(f)?;
        if self.history.is_empty() {
            return writeln!(f, "No confirmations yet.");
        }
        writeln!(f, "| ID | Date | Quantity | Remarks |")?;
        writeln!(f, "|----|------|----------|---------|")?;
        for confirmation in &self.history {
            writeln!(f, "{confirmation}")?;
        }
        Ok(())
    }
}
