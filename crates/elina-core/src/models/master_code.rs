//! Master-code lookups and bulk import results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MasterCode {
    pub code_id: u64,
    pub code_type: String,
    pub code_value: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(rename = "activateFlag", default, deserialize_with = "null_as_default")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MasterCodeDraft {
    pub code_type: String,
    pub code_value: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    #[serde(rename = "activateFlag")]
    pub active: bool,
}

/// What the import would do (or did) with a row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportAction {
    Create,
    Update,
    Skip,
}

impl fmt::Display for ImportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImportAction::Create => "CREATE",
            ImportAction::Update => "UPDATE",
            ImportAction::Skip => "SKIP",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadRow {
    pub row_number: u32,
    #[serde(default)]
    pub code_type: Option<String>,
    #[serde(default)]
    pub code_value: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    pub valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    #[serde(default)]
    pub action: Option<ImportAction>,
}

/// Outcome of a dry run or a committed import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResult {
    pub dry_run: bool,
    pub total_rows: u32,
    pub valid_rows: u32,
    pub invalid_rows: u32,
    #[serde(default)]
    pub created_count: u32,
    #[serde(default)]
    pub updated_count: u32,
    #[serde(default)]
    pub skipped_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<BulkUploadRow>,
}

impl BulkUploadResult {
    /// A dry run with no invalid rows may be committed.
    pub fn is_committable(&self) -> bool {
        self.dry_run && self.invalid_rows == 0
    }
}

impl fmt::Display for MasterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} |",
            self.code_type,
            self.code_value,
            self.short_description.as_deref().unwrap_or("-"),
            if self.active { "Active" } else { "Inactive" }
        )
    }
}

impl fmt::Display for BulkUploadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(f, "# Validation Results (Dry Run)")?;
        } else {
            writeln!(f, "# Upload Results")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "**Rows:** {} total, {} valid, {} invalid",
            self.total_rows, self.valid_rows, self.invalid_rows
        )?;
        if !self.dry_run {
            writeln!(
                f,
                "**Applied:** {} created, {} updated, {} skipped",
                self.created_count, self.updated_count, self.skipped_count
            )?;
        }
        if !self.rows.is_empty() {
            writeln!(f)?;
            writeln!(f, "| Row | Type | Value | Action | Errors |")?;
            writeln!(f, "|---|---|---|---|---|")?;
            for row in &self.rows {
                writeln!(
                    f,
                    "| {} | {} | {} | {} | {} |",
                    row.row_number,
                    row.code_type.as_deref().unwrap_or("-"),
                    row.code_value.as_deref().unwrap_or("-"),
                    row.action.map_or_else(|| "-".to_string(), |a| a.to_string()),
                    if row.errors.is_empty() { "-".to_string() } else { row.errors.join("; ") }
                )?;
            }
        }
        Ok(())
    }
}
