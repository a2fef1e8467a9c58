//! Manpower and equipment allocations against WBS nodes.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::null_as_default;
use crate::error::{ConsoleError, Result};

/// The two bookable resource families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Manpower,
    Equipment,
}

impl ResourceKind {
    /// Path segment used by the resource endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Manpower => "manpower",
            ResourceKind::Equipment => "equipment",
        }
    }

    /// Name of the resource id field in request payloads.
    fn id_field(&self) -> &'static str {
        match self {
            ResourceKind::Manpower => "employeeId",
            ResourceKind::Equipment => "equipmentId",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manpower" | "employee" => Ok(ResourceKind::Manpower),
            "equipment" => Ok(ResourceKind::Equipment),
            _ => Err(format!("Invalid resource kind: {s}")),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A booking of a resource for a date range. Cost is server-derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    pub allocation_id: u64,
    pub wbs_id: u64,
    #[serde(alias = "employeeId", alias = "equipmentId")]
    pub resource_id: u64,
    #[serde(default, alias = "employeeName", alias = "equipmentName")]
    pub resource_name: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub duration_days: Option<i64>,
    #[serde(default)]
    pub hours_per_day: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate_per_day: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_cost: Decimal,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Create/update input for an allocation. Deliberately has no cost field.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    pub kind: ResourceKind,
    pub wbs_id: u64,
    pub resource_id: u64,
    pub start_date: Date,
    pub end_date: Date,
    pub hours_per_day: Option<Decimal>,
    pub remarks: Option<String>,
}

impl AllocationRequest {
    /// Rejects ranges that end before they start.
    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(ConsoleError::validation("endDate")
                .with_reason("End date must be on or after start date"));
        }
        Ok(())
    }

    /// Wire payload with the kind-specific resource id field.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "wbsId": self.wbs_id,
            "startDate": self.start_date,
            "endDate": self.end_date,
            "hoursPerDay": self.hours_per_day,
            "remarks": self.remarks,
        });
        payload[self.kind.id_field()] = json!(self.resource_id);
        payload
    }
}

/// Searchable resource returned by the options endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOption {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate_per_day: Decimal,
    #[serde(default)]
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub resource_name: String,
    pub resource_type: String,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(default)]
    pub duration_days: Option<i64>,
}

/// Server cost totals for a WBS node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub wbs_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manpower_cost: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub equipment_cost: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_cost: Decimal,
}

/// Server-side cost preview for a prospective allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub total_days: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate_per_day: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_cost: Decimal,
}

/// A display-only cost estimate. It is never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostPreview {
    pub days: i64,
    pub rate_per_day: Decimal,
    pub total: Decimal,
}

impl CostPreview {
    /// Inclusive day count times the daily rate.
    pub fn estimate(start: Date, end: Date, rate_per_day: Decimal) -> Result<Self> {
        if end < start {
            return Err(ConsoleError::validation("endDate")
                .with_reason("End date must be on or after start date"));
        }
        let span = start.until(end).map_err(|e| ConsoleError::Configuration {
            message: format!("Cannot compute day span: {e}"),
        })?;
        let days = i64::from(span.get_days()) + 1;
        Ok(Self {
            days,
            rate_per_day,
            total: Decimal::from(days) * rate_per_day,
        })
    }
}

impl fmt::Display for CostPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Estimated cost (preview): {} days × {:.2}/day = {:.2}",
            self.days, self.rate_per_day, self.total
        )
    }
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Cost summary: WBS {}", self.wbs_id)?;
        writeln!(f)?;
        writeln!(f, "- **Manpower:** {:.2}", self.manpower_cost)?;
        writeln!(f, "- **Equipment:** {:.2}", self.equipment_cost)?;
        writeln!(f, "- **Total:** {:.2}", self.total_cost)
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cost: {} days × {:.2}/day = {:.2}",
            self.total_days, self.rate_per_day, self.total_cost
        )
    }
}

impl fmt::Display for ResourceAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} | {:.2} | {:.2} |",
            self.allocation_id,
            self.resource_name.as_deref().unwrap_or("-"),
            self.start_date,
            self.end_date,
            self.rate_per_day,
            self.total_cost
        )
    }
}
