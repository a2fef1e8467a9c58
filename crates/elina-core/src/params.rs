//! Parameter structures for console operations.
//!
//! These carry no framework derives. The CLI wraps them in clap structs and
//! converts with `From`, so the core stays independent of any interface.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │
//! │  (clap derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘
//! ```

use std::path::PathBuf;

use jiff::civil::Date;

use crate::models::{PlanCreation, ResourceKind};

/// Parameters identifying a single entity by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id {
    pub id: u64,
}

/// Credentials for `login`.
#[derive(Debug, Clone)]
pub struct Login {
    pub tenant_code: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListProjects {
    pub search: Option<String>,
}

/// A new plan version for one task.
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub task_id: u64,
    pub version_date: Date,
    pub description: Option<String>,
    pub creation: PlanCreation,
}

/// Daily plan/actual summary of a task over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSummary {
    pub task_id: u64,
    pub from: Date,
    pub to: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareVersions {
    pub from_version: u64,
    pub to_version: u64,
}

/// Searches the employee or equipment catalogue.
#[derive(Debug, Clone)]
pub struct ResourceSearch {
    pub kind: ResourceKind,
    pub search: Option<String>,
}

/// Server-side cost preview for one resource over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostQuery {
    pub kind: ResourceKind,
    pub resource_id: u64,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListRules {
    pub active_only: bool,
}

/// A master-data spreadsheet to validate or import.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub path: PathBuf,
}
