//! Result wrappers for create, update and delete operations.

use std::fmt;

use crate::models::{
    BusinessRule, Confirmation, MasterCode, PlanVersion, Project, ResourceAllocation, Task,
    TaskUpdate, Wbs,
};

/// A record the backend created, updated or deleted.
pub trait Resource {
    /// Lowercase noun used in messages.
    const NOUN: &'static str;

    fn resource_id(&self) -> u64;
}

impl Resource for BusinessRule {
    const NOUN: &'static str = "business rule";

    fn resource_id(&self) -> u64 {
        self.rule_id
    }
}

impl Resource for MasterCode {
    const NOUN: &'static str = "master code";

    fn resource_id(&self) -> u64 {
        self.code_id
    }
}

impl Resource for ResourceAllocation {
    const NOUN: &'static str = "allocation";

    fn resource_id(&self) -> u64 {
        self.allocation_id
    }
}

impl Resource for PlanVersion {
    const NOUN: &'static str = "plan version";

    fn resource_id(&self) -> u64 {
        self.version_id
    }
}

impl Resource for Project {
    const NOUN: &'static str = "project";

    fn resource_id(&self) -> u64 {
        self.project_id
    }
}

impl Resource for Wbs {
    const NOUN: &'static str = "WBS";

    fn resource_id(&self) -> u64 {
        self.wbs_id
    }
}

impl Resource for Task {
    const NOUN: &'static str = "task";

    fn resource_id(&self) -> u64 {
        self.task_id
    }
}

impl Resource for TaskUpdate {
    const NOUN: &'static str = "task update";

    fn resource_id(&self) -> u64 {
        self.update_id
    }
}

impl Resource for Confirmation {
    const NOUN: &'static str = "confirmation";

    fn resource_id(&self) -> u64 {
        self.confirmation_id
    }
}

/// Formats a creation result followed by the created record.
///
/// ```rust
/// use elina_core::{display::CreateResult, models::MasterCode};
///
/// let code = MasterCode {
///     code_id: 12,
///     code_type: "WORK_CENTER".to_string(),
///     code_value: "WC_SITE".to_string(),
///     short_description: None,
///     long_description: None,
///     active: true,
/// };
/// let output = CreateResult::new(code).to_string();
/// assert!(output.starts_with("Created master code with ID: 12"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Resource + fmt::Display> fmt::Display for CreateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} with ID: {}", T::NOUN, self.resource.resource_id())?;
        writeln!(f)?;
        writeln!(f, "{}", self.resource)
    }
}

/// Formats an update result, optionally listing what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: Resource + fmt::Display> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} with ID: {}", T::NOUN, self.resource.resource_id())?;
        writeln!(f)?;
        if !self.changes.is_empty() {
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", self.resource)
    }
}

/// Formats a deletion confirmation.
pub struct DeleteResult {
    pub noun: &'static str,
    pub id: u64,
}

impl DeleteResult {
    pub fn new(noun: &'static str, id: u64) -> Self {
        Self { noun, id }
    }

    /// Deletion message for a resource type.
    pub fn of<T: Resource>(id: u64) -> Self {
        Self::new(T::NOUN, id)
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deleted {} with ID: {}", self.noun, self.id)
    }
}
