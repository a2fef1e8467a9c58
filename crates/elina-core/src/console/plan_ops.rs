//! Plan version operations.

use jiff::civil::Date;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Console;
use crate::{
    error::{ConsoleError, Result},
    models::{
        CreationMode, DailyLine, DateRangeSplit, PlanCreation, PlanLine, PlanVersion, RuleCheck,
        SplitType, VersionComparison,
    },
    params::{CompareVersions, CreatePlan, Id},
    transport::ApiRequest,
};

/// Body of `POST /api/plans/create-with-mode`. Only the block matching
/// `mode` is present.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateWithMode<'a> {
    task_id: u64,
    version_date: Date,
    description: Option<&'a str>,
    mode: CreationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    daily_lines: Option<&'a [DailyLine]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range_split: Option<&'a DateRangeSplit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    single_line: Option<&'a DailyLine>,
}

impl<'a> From<&'a CreatePlan> for CreateWithMode<'a> {
    fn from(params: &'a CreatePlan) -> Self {
        let mut body = CreateWithMode {
            task_id: params.task_id,
            version_date: params.version_date,
            description: params.description.as_deref(),
            mode: params.creation.mode(),
            daily_lines: None,
            range_split: None,
            single_line: None,
        };
        match &params.creation {
            PlanCreation::DailyEntry(lines) => body.daily_lines = Some(lines),
            PlanCreation::DateRangeSplit(split) => body.range_split = Some(split),
            PlanCreation::SingleLineQuick(line) => body.single_line = Some(line),
        }
        body
    }
}

/// Dates the plan-date rule is checked against before creation.
fn planned_dates(creation: &PlanCreation) -> Vec<Date> {
    match creation {
        PlanCreation::DailyEntry(lines) => lines.iter().map(|line| line.planned_date).collect(),
        PlanCreation::DateRangeSplit(split) => vec![split.start_date, split.end_date],
        PlanCreation::SingleLineQuick(line) => vec![line.planned_date],
    }
}

/// Structural checks that never need the backend.
fn validate_creation(creation: &PlanCreation) -> Result<()> {
    match creation {
        PlanCreation::DailyEntry(lines) => {
            if lines.is_empty() {
                return Err(ConsoleError::validation("dailyLines")
                    .with_reason("At least one daily line is required"));
            }
            lines.iter().try_for_each(validate_line)
        }
        PlanCreation::SingleLineQuick(line) => validate_line(line),
        PlanCreation::DateRangeSplit(split) => validate_split(split),
    }
}

fn validate_line(line: &DailyLine) -> Result<()> {
    if line.planned_qty < Decimal::ZERO {
        return Err(ConsoleError::validation("plannedQty").with_reason(format!(
            "Planned quantity for {} must not be negative",
            line.planned_date
        )));
    }
    Ok(())
}

fn validate_split(split: &DateRangeSplit) -> Result<()> {
    if split.end_date < split.start_date {
        return Err(ConsoleError::validation("endDate")
            .with_reason("End date must be on or after start date"));
    }
    if split.total_qty <= Decimal::ZERO {
        return Err(ConsoleError::validation("totalQty")
            .with_reason("Total quantity must be greater than zero"));
    }
    if split.split_type == SplitType::CustomSplit {
        let quantities = split.custom_quantities.as_deref().unwrap_or_default();
        match split.split_count {
            Some(count) if count as usize == quantities.len() => {}
            Some(count) => {
                return Err(ConsoleError::validation("customQuantities").with_reason(format!(
                    "Custom split declares {count} period(s) but {} quantities were given",
                    quantities.len()
                )));
            }
            None => {
                return Err(ConsoleError::validation("splitCount")
                    .with_reason("Custom split requires a split count"));
            }
        }
    }
    Ok(())
}

impl Console {
    /// All versions of a task, newest first as the backend returns them.
    pub async fn list_versions(&self, task: &Id) -> Result<Vec<PlanVersion>> {
        self.client
            .fetch(ApiRequest::get(format!("/api/plans/task/{}", task.id)))
            .await
    }

    pub async fn version_lines(&self, version: &Id) -> Result<Vec<PlanLine>> {
        self.client
            .fetch(ApiRequest::get(format!("/api/plans/{}/lines", version.id)))
            .await
    }

    /// Creates a version in one of the three modes.
    ///
    /// Structural mistakes are rejected locally without contacting the
    /// backend. The planned dates are then checked against the plan-date
    /// rule; a violation stops the creation, while a check that fails for
    /// any other reason is logged and the creation proceeds.
    pub async fn create_version(&self, params: &CreatePlan) -> Result<PlanVersion> {
        validate_creation(&params.creation)?;
        self.precheck_plan_dates(params).await?;

        let request =
            ApiRequest::post("/api/plans/create-with-mode").json(&CreateWithMode::from(params))?;
        let version: PlanVersion = self.client.fetch(request).await?;
        info!(
            "Created plan version {} for task {}",
            version.version_no, params.task_id
        );
        Ok(version)
    }

    async fn precheck_plan_dates(&self, params: &CreatePlan) -> Result<()> {
        let check = RuleCheck::plan_dates(
            params.task_id,
            params.version_date,
            planned_dates(&params.creation),
        );
        match self.validate_rule(&check).await {
            Ok(()) => Ok(()),
            Err(e @ (ConsoleError::RuleViolation(_) | ConsoleError::SessionTerminated { .. })) => {
                Err(e)
            }
            Err(e) => {
                warn!("Plan date pre-check skipped: {e}");
                Ok(())
            }
        }
    }

    /// Makes `version` the single active version of its task.
    pub async fn activate_version(&self, version: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::put(format!("/api/plans/{}/activate", version.id)))
            .await?;
        info!("Activated plan version {}", version.id);
        Ok(())
    }

    /// Reactivates an earlier version.
    pub async fn revert_to_version(&self, version: &Id) -> Result<()> {
        self.client
            .execute(ApiRequest::put(format!("/api/plans/{}/revert", version.id)))
            .await?;
        info!("Reverted to plan version {}", version.id);
        Ok(())
    }

    pub async fn compare_versions(&self, params: &CompareVersions) -> Result<VersionComparison> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/api/plans/compare/{}/{}",
                params.from_version, params.to_version
            )))
            .await
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn custom_split(count: Option<u32>, quantities: Vec<i64>) -> PlanCreation {
        PlanCreation::DateRangeSplit(DateRangeSplit {
            start_date: date(2025, 11, 1),
            end_date: date(2025, 11, 30),
            total_qty: Decimal::from(100),
            split_type: SplitType::CustomSplit,
            split_count: count,
            custom_quantities: Some(quantities.into_iter().map(Decimal::from).collect()),
        })
    }

    #[test]
    fn test_custom_split_count_must_match() {
        let err = validate_creation(&custom_split(Some(3), vec![50, 50]))
            .expect_err("mismatched split should fail");
        assert!(matches!(err, ConsoleError::Validation { ref field, .. } if field == "customQuantities"));

        assert!(validate_creation(&custom_split(None, vec![50, 50])).is_err());
        assert!(validate_creation(&custom_split(Some(2), vec![50, 50])).is_ok());
    }

    #[test]
    fn test_range_and_daily_checks() {
        let mut split = DateRangeSplit {
            start_date: date(2025, 11, 10),
            end_date: date(2025, 11, 1),
            total_qty: Decimal::from(10),
            split_type: SplitType::EqualSplit,
            split_count: None,
            custom_quantities: None,
        };
        assert!(validate_split(&split).is_err());
        split.end_date = date(2025, 11, 20);
        assert!(validate_split(&split).is_ok());

        assert!(validate_creation(&PlanCreation::DailyEntry(Vec::new())).is_err());
    }

    #[test]
    fn test_planned_dates_per_mode() {
        let split = PlanCreation::DateRangeSplit(DateRangeSplit {
            start_date: date(2025, 11, 1),
            end_date: date(2025, 11, 30),
            total_qty: Decimal::from(30),
            split_type: SplitType::EqualSplit,
            split_count: None,
            custom_quantities: None,
        });
        assert_eq!(planned_dates(&split), vec![date(2025, 11, 1), date(2025, 11, 30)]);

        let daily = PlanCreation::DailyEntry(vec![
            DailyLine {
                planned_date: date(2025, 11, 3),
                planned_qty: Decimal::from(4),
                description: None,
            },
            DailyLine {
                planned_date: date(2025, 11, 4),
                planned_qty: Decimal::from(6),
                description: None,
            },
        ]);
        assert_eq!(planned_dates(&daily), vec![date(2025, 11, 3), date(2025, 11, 4)]);
    }

    #[test]
    fn test_wire_body_carries_only_selected_mode() {
        let params = CreatePlan {
            task_id: 9,
            version_date: date(2025, 11, 1),
            description: Some("rebaseline".to_string()),
            creation: PlanCreation::SingleLineQuick(DailyLine {
                planned_date: date(2025, 11, 5),
                planned_qty: Decimal::from(12),
                description: None,
            }),
        };
        let body = serde_json::to_value(CreateWithMode::from(&params)).expect("serialize");
        assert_eq!(body["mode"], "SINGLE_LINE_QUICK");
        assert_eq!(body["taskId"], 9);
        assert!(body.get("singleLine").is_some());
        assert!(body.get("dailyLines").is_none());
        assert!(body.get("rangeSplit").is_none());
    }
}
