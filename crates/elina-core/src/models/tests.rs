//! Tests for backend payload decoding and model helpers.

use jiff::civil::date;
use rust_decimal::Decimal;
use serde_json::json;

use super::*;

#[test]
fn test_day_wise_row_decodes_backend_payload() {
    let row: DayWiseUpdateRow = serde_json::from_value(json!({
        "updateDate": "2025-11-02",
        "planQty": 5,
        "actualQty": 8,
        "variance": 999,
        "updateId": null,
        "remarks": null,
        "isLocked": false,
        "canEdit": true
    }))
    .expect("row should decode");

    assert_eq!(row.date(), date(2025, 11, 2));
    assert_eq!(row.planned_qty(), Decimal::from(5));
    // incoming variance is ignored, it is always derived
    assert_eq!(row.variance(), Decimal::from(3));
    assert!(row.is_editable());
    assert_eq!(row.update_id(), None);
}

#[test]
fn test_day_wise_row_null_flags_use_defaults() {
    let row: DayWiseUpdateRow = serde_json::from_value(json!({
        "updateDate": "2025-11-01",
        "planQty": null,
        "actualQty": null,
        "isLocked": null,
        "canEdit": null
    }))
    .expect("row should decode");

    assert_eq!(row.planned_qty(), Decimal::ZERO);
    assert!(!row.is_locked());
    assert!(row.can_edit());
}

#[test]
fn test_row_status_precedence() {
    let base = DayWiseUpdateRow::new(date(2025, 11, 1), Decimal::TEN, Decimal::ZERO);
    assert_eq!(base.status(), RowStatus::Editable);
    assert_eq!(base.clone().restricted().status(), RowStatus::Restricted);
    assert_eq!(base.restricted().locked().status(), RowStatus::Locked);
}

#[test]
fn test_to_entry_selection() {
    let d = date(2025, 11, 1);
    let empty = DayWiseUpdateRow::new(d, Decimal::TEN, Decimal::ZERO);
    assert!(empty.to_entry().is_none());

    let existing = DayWiseUpdateRow::new(d, Decimal::TEN, Decimal::ZERO).with_update_id(7);
    assert!(existing.to_entry().is_some());

    let locked = DayWiseUpdateRow::new(d, Decimal::TEN, Decimal::ONE).locked();
    assert!(locked.to_entry().is_none());

    let entry = DayWiseUpdateRow::new(d, Decimal::TEN, Decimal::ONE)
        .with_remarks("site A")
        .to_entry()
        .expect("entry expected");
    assert_eq!(entry.actual_qty, Decimal::ONE);
    assert_eq!(entry.remarks.as_deref(), Some("site A"));
}

#[test]
fn test_variance_kind() {
    let d = date(2025, 11, 1);
    assert_eq!(
        DayWiseUpdateRow::new(d, Decimal::from(5), Decimal::from(8)).variance_kind(),
        VarianceKind::Over
    );
    assert_eq!(
        DayWiseUpdateRow::new(d, Decimal::from(5), Decimal::from(2)).variance_kind(),
        VarianceKind::Under
    );
    assert_eq!(
        DayWiseUpdateRow::new(d, Decimal::from(5), Decimal::from(5)).variance_kind(),
        VarianceKind::OnPlan
    );
}

#[test]
fn test_plan_version_decodes() {
    let version: PlanVersion = serde_json::from_value(json!({
        "planVersionId": 11,
        "tenantId": 1,
        "taskId": 3,
        "versionNo": 2,
        "versionDate": "2025-10-30",
        "description": "rebaseline",
        "isActive": true,
        "createdOn": "2025-10-30T09:15:00"
    }))
    .expect("version should decode");

    assert_eq!(version.version_id, 11);
    assert!(version.is_active);
    assert_eq!(format!("{version}"), "v2 (2025-10-30) **active** - rebaseline");
}

#[test]
fn test_comparison_decodes_statuses() {
    let comparison: VersionComparison = serde_json::from_value(json!({
        "version1": {"planVersionId": 1, "taskId": 3, "versionNo": 1, "versionDate": "2025-10-01", "isActive": false},
        "version2": {"planVersionId": 2, "taskId": 3, "versionNo": 2, "versionDate": "2025-10-15", "isActive": true},
        "comparisonLines": [
            {"plannedDate": "2025-11-01", "qtyVersion1": 10, "qtyVersion2": 12, "difference": 2, "status": "INCREASED"},
            {"plannedDate": "2025-11-02", "qtyVersion1": null, "qtyVersion2": 4, "difference": 4, "status": "NEW"}
        ],
        "summary": {"totalDaysVersion1": 1, "totalDaysVersion2": 2, "commonDays": 1, "newDays": 1,
                    "removedDays": 0, "totalQtyVersion1": 10, "totalQtyVersion2": 16,
                    "totalDifference": 6, "changeStatistics": {"INCREASED": 1, "NEW": 1}}
    }))
    .expect("comparison should decode");

    assert_eq!(comparison.comparison_lines[0].status, ComparisonStatus::Increased);
    assert_eq!(comparison.comparison_lines[1].qty_version1, None);
    let output = format!("{comparison}");
    assert!(output.contains("| 2025-11-02 | - | 4.00 | 4.00 | NEW |"));
    assert!(output.contains("- INCREASED: 1"));
}

#[test]
fn test_confirmation_accepts_entity_id() {
    let confirmation: Confirmation = serde_json::from_value(json!({
        "confirmationId": 5,
        "entityType": "WBS",
        "entityId": 1,
        "confirmationDate": "2025-10-31",
        "confirmedBy": 9,
        "remarks": "month end"
    }))
    .expect("confirmation should decode");

    assert_eq!(confirmation.wbs_id, 1);
    assert_eq!(confirmation.created_by, Some(9));
}

#[test]
fn test_allocation_decodes_both_kinds() {
    let manpower: ResourceAllocation = serde_json::from_value(json!({
        "allocationId": 1, "wbsId": 4, "employeeId": 20, "employeeName": "R. Iyer",
        "startDate": "2025-11-01", "endDate": "2025-11-05", "ratePerDay": 1500, "totalCost": 7500
    }))
    .expect("manpower should decode");
    let equipment: ResourceAllocation = serde_json::from_value(json!({
        "allocationId": 2, "wbsId": 4, "equipmentId": 30, "equipmentName": "Crane",
        "startDate": "2025-11-01", "endDate": "2025-11-01", "ratePerDay": 9000, "totalCost": 9000
    }))
    .expect("equipment should decode");

    assert_eq!(manpower.resource_id, 20);
    assert_eq!(equipment.resource_name.as_deref(), Some("Crane"));
}

#[test]
fn test_allocation_payload_has_no_cost() {
    let request = AllocationRequest {
        kind: ResourceKind::Equipment,
        wbs_id: 4,
        resource_id: 30,
        start_date: date(2025, 11, 1),
        end_date: date(2025, 11, 3),
        hours_per_day: None,
        remarks: None,
    };
    let payload = request.to_payload();

    assert_eq!(payload["equipmentId"], json!(30));
    assert!(payload.get("employeeId").is_none());
    assert!(payload.get("totalCost").is_none());
}

#[test]
fn test_cost_preview_counts_inclusive_days() {
    let preview =
        CostPreview::estimate(date(2025, 11, 1), date(2025, 11, 5), Decimal::from(1500))
            .expect("valid range");
    assert_eq!(preview.days, 5);
    assert_eq!(preview.total, Decimal::from(7500));

    assert!(CostPreview::estimate(date(2025, 11, 5), date(2025, 11, 1), Decimal::ONE).is_err());
}

#[test]
fn test_local_violation_uses_client_namespace() {
    let violation = BusinessRuleViolation::actual_exceeds_planned(2);
    assert!(violation.is_local());
    assert!(violation.message.contains("Found 2 violation(s)"));
    assert_ne!(violation.rule, RuleRef::Server(401));
}

#[test]
fn test_bulk_upload_commit_gate() {
    let result: BulkUploadResult = serde_json::from_value(json!({
        "dryRun": true, "totalRows": 2, "validRows": 2, "invalidRows": 0,
        "rows": [{"rowNumber": 1, "codeType": "UNIT", "codeValue": "M3", "valid": true, "errors": [], "action": "CREATE"}]
    }))
    .expect("result should decode");
    assert!(result.is_committable());
    assert_eq!(result.rows[0].action, Some(ImportAction::Create));
}

#[test]
fn test_draft_field_limits() {
    let task = TaskDraft {
        project_id: 1,
        wbs_id: 2,
        task_code: "T".repeat(51),
        task_name: "Piling".to_string(),
        description: None,
        start_date: None,
        end_date: None,
        planned_qty: None,
        unit: None,
    };
    let err = task.validate().expect_err("code too long");
    assert!(err.to_string().contains("Task code must not exceed 50 characters"));

    let wbs = WbsDraft {
        project_id: 1,
        parent_wbs_id: None,
        wbs_code: String::new(),
        wbs_name: "Structure".to_string(),
        description: None,
        start_date: Some(date(2025, 3, 1)),
        end_date: Some(date(2025, 3, 1)),
        planned_qty: None,
    };
    let err = wbs.validate().expect_err("code required");
    assert!(err.to_string().contains("WBS code is required"));
}

#[test]
fn test_plan_date_check_payload() {
    let check = RuleCheck::plan_dates(42, date(2025, 11, 1), vec![date(2025, 11, 3)]);
    let body = serde_json::to_value(&check).expect("serialize");
    assert_eq!(
        body,
        json!({
            "ruleNumber": PLAN_DATE_RULE,
            "context": {
                "taskId": 42,
                "entityType": "TASK",
                "entityId": 42,
                "planVersionDate": "2025-11-01",
                "dates": ["2025-11-03"]
            }
        })
    );
    let empty = serde_json::to_value(RuleContext::default()).expect("serialize");
    assert_eq!(empty, json!({}));
}

#[test]
fn test_project_accepts_backend_name_field() {
    let project: Project =
        serde_json::from_value(json!({ "projectId": 3, "projectName": "Depot" })).expect("decode");
    assert_eq!(project.name, "Depot");
}
