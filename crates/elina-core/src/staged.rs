//! Validate-then-act flows.
//!
//! A [`StagedAction`] walks an operation through `preview → arm → commit`.
//! Previewing is a read with no side effects and may be repeated freely.
//! Arming is the explicit second step a user takes after seeing the preview
//! restated; only an armed action can commit. Changing the input drops back
//! to a fresh preview.
//!
//! The WBS freeze and the master-code bulk import are both built on this.

use std::fmt;

use async_trait::async_trait;
use log::debug;

use crate::{
    console::Console,
    error::{ConsoleError, Result},
    models::BusinessRuleViolation,
};

/// One validate-then-act operation.
#[async_trait]
pub trait StagedOperation: Send + Sync {
    type Input: Clone + Send + Sync;
    type Preview: Send;
    type Outcome: Send;

    /// Computes what committing `input` would do. Must not persist anything.
    async fn preview(&self, console: &Console, input: &Self::Input) -> Result<Self::Preview>;

    /// Whether `preview` allows the action to be armed.
    fn is_committable(&self, _preview: &Self::Preview) -> bool {
        true
    }

    /// Performs the action.
    async fn commit(&self, console: &Console, input: &Self::Input) -> Result<Self::Outcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    Idle,
    Previewed,
    Armed,
    Committed,
}

impl fmt::Display for StagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StagePhase::Idle => "idle",
            StagePhase::Previewed => "previewed",
            StagePhase::Armed => "armed",
            StagePhase::Committed => "committed",
        };
        write!(f, "{name}")
    }
}

/// Result of [`StagedAction::commit`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome<T> {
    Committed(T),
    /// A business rule rejected the commit; the preview is kept and the
    /// action must be armed again
    Violation(BusinessRuleViolation),
}

/// State of one staged operation.
pub struct StagedAction<Op: StagedOperation> {
    operation: Op,
    phase: StagePhase,
    input: Option<Op::Input>,
    preview: Option<Op::Preview>,
}

impl<Op: StagedOperation> fmt::Debug for StagedAction<Op> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedAction")
            .field("phase", &self.phase)
            .field("staged", &self.input.is_some())
            .finish_non_exhaustive()
    }
}

impl<Op: StagedOperation> StagedAction<Op> {
    pub fn new(operation: Op) -> Self {
        Self {
            operation,
            phase: StagePhase::Idle,
            input: None,
            preview: None,
        }
    }

    pub fn operation(&self) -> &Op {
        &self.operation
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn input(&self) -> Option<&Op::Input> {
        self.input.as_ref()
    }

    pub fn preview(&self) -> Option<&Op::Preview> {
        self.preview.as_ref()
    }

    /// True when the current preview allows arming.
    pub fn is_committable(&self) -> bool {
        self.preview
            .as_ref()
            .is_some_and(|preview| self.operation.is_committable(preview))
    }

    /// Previews `input`, replacing any earlier preview and disarming.
    pub async fn stage(&mut self, console: &Console, input: Op::Input) -> Result<&Op::Preview> {
        self.phase = StagePhase::Idle;
        self.preview = None;
        let preview = self.operation.preview(console, &input).await?;
        self.input = Some(input);
        self.phase = StagePhase::Previewed;
        debug!("Staged action previewed");
        Ok(self.preview.insert(preview))
    }

    /// Second step: confirms the previewed input. Returns the preview so it
    /// can be restated to the user.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` if nothing is previewed or the
    /// preview does not allow committing.
    pub fn arm(&mut self) -> Result<&Op::Preview> {
        if self.phase != StagePhase::Previewed && self.phase != StagePhase::Armed {
            return Err(ConsoleError::validation("stage")
                .with_reason(format!("cannot arm while {}", self.phase)));
        }
        let Some(preview) = self.preview.as_ref() else {
            return Err(ConsoleError::validation("stage").with_reason("nothing previewed"));
        };
        if !self.operation.is_committable(preview) {
            return Err(ConsoleError::validation("stage")
                .with_reason("the preview reports problems that must be fixed first"));
        }
        self.phase = StagePhase::Armed;
        Ok(preview)
    }

    /// Steps back from `Armed` to `Previewed`.
    pub fn disarm(&mut self) {
        if self.phase == StagePhase::Armed {
            self.phase = StagePhase::Previewed;
        }
    }

    /// Commits the armed input.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` if the action is not armed, and
    /// any non-violation failure of the operation.
    pub async fn commit(&mut self, console: &Console) -> Result<CommitOutcome<Op::Outcome>> {
        if self.phase != StagePhase::Armed {
            return Err(ConsoleError::validation("stage")
                .with_reason(format!("cannot commit while {}", self.phase)));
        }
        let Some(input) = self.input.as_ref() else {
            return Err(ConsoleError::validation("stage").with_reason("nothing previewed"));
        };

        match self.operation.commit(console, input).await {
            Ok(outcome) => {
                self.phase = StagePhase::Committed;
                Ok(CommitOutcome::Committed(outcome))
            }
            Err(ConsoleError::RuleViolation(violation)) => {
                self.phase = StagePhase::Previewed;
                Ok(CommitOutcome::Violation(violation))
            }
            Err(e) => {
                self.phase = StagePhase::Previewed;
                Err(e)
            }
        }
    }

    /// Forgets input and preview.
    pub fn reset(&mut self) {
        self.phase = StagePhase::Idle;
        self.input = None;
        self.preview = None;
    }
}
