//! Confirmation (freeze) records and the WBS confirmation summary.

use std::fmt;

use jiff::civil::{Date, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// An append-only audit entry freezing a WBS node up to a date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub confirmation_id: u64,
    /// WBS id the confirmation belongs to
    #[serde(alias = "wbsId", rename = "entityId")]
    pub wbs_id: u64,
    pub confirmation_date: Date,
    /// Quantity snapshot taken when the confirmation was made
    #[serde(default)]
    pub confirmed_qty: Option<Decimal>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default, alias = "confirmedBy")]
    pub created_by: Option<u64>,
    #[serde(default, alias = "confirmedOn")]
    pub created_on: Option<DateTime>,
}

/// Aggregated confirmation state of a WBS node, optionally including a
/// read-only preview for a candidate date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationSummary {
    pub wbs_id: u64,
    #[serde(default)]
    pub wbs_code: Option<String>,
    #[serde(default)]
    pub wbs_name: Option<String>,
    #[serde(default)]
    pub last_confirmation_date: Option<Date>,
    /// Dates on or before this are frozen system-wide
    #[serde(default)]
    pub lock_date: Option<Date>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub planned_qty: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actual_qty: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confirmed_qty_to_date: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variance: Decimal,
    #[serde(default)]
    pub preview_date: Option<Date>,
    #[serde(default)]
    pub preview_actual_qty: Option<Decimal>,
}

/// Payload for `POST /api/confirmations/wbs/{wbsId}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationRequest {
    pub confirmation_date: Date,
    pub remarks: Option<String>,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} |",
            self.confirmation_id,
            self.confirmation_date,
            self.confirmed_qty
                .map_or_else(|| "-".to_string(), |q| format!("{q:.2}")),
            self.remarks.as_deref().unwrap_or("-")
        )
    }
}

impl fmt::Display for ConfirmationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "# Confirmations")?;
        if let Some(name) = &self.wbs_name {
            write!(f, " - {name}")?;
        }
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "**Planned:** {:.2}", self.planned_qty)?;
        writeln!(f, "**Actual:** {:.2}", self.actual_qty)?;
        writeln!(f, "**Confirmed to date:** {:.2}", self.confirmed_qty_to_date)?;
        writeln!(f, "**Variance:** {:.2}", self.variance)?;
        match self.last_confirmation_date {
            Some(date) => writeln!(f, "**Last confirmation:** {date}")?,
            None => writeln!(f, "**Last confirmation:** none")?,
        }
        if let (Some(date), Some(qty)) = (self.preview_date, self.preview_actual_qty) {
            writeln!(f, "**Preview for {date}:** {qty:.2}")?;
        }
        Ok(())
    }
}
