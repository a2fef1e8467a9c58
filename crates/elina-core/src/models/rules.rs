//! Business-rule definitions administered on the backend.

use std::fmt;

use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A numbered, toggleable validation rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRule {
    pub rule_id: u64,
    pub rule_number: i32,
    pub control_point: String,
    #[serde(default)]
    pub applicability: Option<String>,
    #[serde(default)]
    pub rule_value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "activateFlag", default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default)]
    pub updated_on: Option<DateTime>,
}

/// Create/update payload for a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRuleDraft {
    pub rule_number: i32,
    pub control_point: String,
    pub applicability: Option<String>,
    pub rule_value: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "activateFlag")]
    pub active: bool,
}

/// Rule 201: planned dates cannot lie in the future.
pub const PLAN_DATE_RULE: i32 = 201;

/// Facts a single rule is evaluated against. Absent facts are omitted from
/// the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_version_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<Date>,
}

/// Body of `POST /api/business-rules/validate-single`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleCheck {
    pub rule_number: i32,
    pub context: RuleContext,
}

impl RuleCheck {
    /// Checks the dates of a plan about to be created for `task_id`.
    pub fn plan_dates(task_id: u64, version_date: Date, dates: Vec<Date>) -> Self {
        Self {
            rule_number: PLAN_DATE_RULE,
            context: RuleContext {
                task_id: Some(task_id),
                entity_type: Some("TASK".to_string()),
                entity_id: Some(task_id),
                plan_version_date: Some(version_date),
                dates,
                ..RuleContext::default()
            },
        }
    }
}

impl fmt::Display for BusinessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} | {} |",
            self.rule_number,
            self.control_point,
            self.rule_value.as_deref().unwrap_or("-"),
            self.description.as_deref().unwrap_or("-"),
            if self.active { "Active" } else { "Inactive" }
        )
    }
}
