//! Data models exchanged with the project-management backend.
//!
//! Every model deserializes from the backend's camelCase JSON and implements
//! [`std::fmt::Display`] as markdown, so the same value can be printed by the
//! CLI or embedded in a larger report. Collection and view-level formatting
//! lives in [`crate::display`].
//!
//! The backend is authoritative for every value here. Derived values that the
//! client shows (variance, cost previews) are computed from the fetched
//! fields on demand and never written back.

use serde::{Deserialize, Deserializer};

pub mod confirmation;
pub mod day_wise;
pub mod master_code;
pub mod plan;
pub mod project;
pub mod resource;
pub mod rules;
pub mod session;
pub mod violation;

#[cfg(test)]
mod tests;

pub use confirmation::{Confirmation, ConfirmationRequest, ConfirmationSummary};
pub use day_wise::{
    DailySummary, DayWiseBatch, DayWiseEntry, DayWiseUpdateRow, RowStatus, TaskUpdate,
    TaskUpdateDraft, VarianceKind,
};
pub use master_code::{BulkUploadResult, BulkUploadRow, ImportAction, MasterCode, MasterCodeDraft};
pub use plan::{
    ComparisonLine, ComparisonStatus, ComparisonSummary, CreationMode, DailyLine, DateRangeSplit,
    PlanCreation, PlanLine, PlanVersion, SplitType, VersionComparison,
};
pub use project::{Project, ProjectDraft, Task, TaskDraft, Wbs, WbsDraft};
pub use resource::{
    AllocationRequest, CostBreakdown, CostPreview, CostSummary, ResourceAllocation, ResourceKind,
    ResourceOption, TimelineItem,
};
pub use rules::{BusinessRule, BusinessRuleDraft, RuleCheck, RuleContext, PLAN_DATE_RULE};
pub use session::{LoginResponse, Session, TenantInfo, UserProfile};
pub use violation::{BusinessRuleViolation, ClientRule, RuleRef};

/// Deserializes a nullable JSON value, substituting the type's default for
/// `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a nullable boolean that defaults to `true`.
pub(crate) fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

pub(crate) fn default_true() -> bool {
    true
}
