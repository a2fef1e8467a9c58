//! Business-rule violation values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Checks the client performs itself before contacting the backend.
///
/// These live in their own namespace so they can never be confused with the
/// administratively numbered rules configured on the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientRule {
    /// A day-wise row reports more actual quantity than was planned
    ActualExceedsPlanned,
}

impl ClientRule {
    /// Stable identifier used in rendered output and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ClientRule::ActualExceedsPlanned => "ACTUAL_EXCEEDS_PLANNED",
        }
    }
}

/// Identifies which rule produced a violation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "source", content = "id", rename_all = "lowercase")]
pub enum RuleRef {
    /// A rule configured and evaluated on the backend, by rule number
    Server(i32),
    /// A backend violation that arrived without a rule number
    Unnumbered,
    /// A local pre-flight check
    Client(ClientRule),
}

impl fmt::Display for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleRef::Server(number) => write!(f, "Rule #{number}"),
            RuleRef::Unnumbered => write!(f, "Business rule"),
            RuleRef::Client(rule) => write!(f, "Client check {}", rule.code()),
        }
    }
}

/// A structured rule failure. Transient: it lives for one display and has no
/// identity of its own.
///
/// Backend text is carried verbatim; nothing in the client rewords it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessRuleViolation {
    pub rule: RuleRef,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl BusinessRuleViolation {
    /// Builds the violation reported by the local over-plan guard.
    pub fn actual_exceeds_planned(offending_rows: usize) -> Self {
        Self {
            rule: RuleRef::Client(ClientRule::ActualExceedsPlanned),
            message: format!(
                "Actual quantity cannot exceed planned quantity. Found {offending_rows} violation(s)."
            ),
            hint: Some(
                "Adjust actual quantities to be less than or equal to planned quantities."
                    .to_string(),
            ),
        }
    }

    /// True when the violation came from a local pre-flight check.
    pub fn is_local(&self) -> bool {
        matches!(self.rule, RuleRef::Client(_))
    }
}

impl fmt::Display for BusinessRuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}
