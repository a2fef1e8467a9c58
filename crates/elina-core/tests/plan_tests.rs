mod common;

use common::{create_test_console, ScriptedBackend};
use elina_core::{
    models::{DailyLine, DateRangeSplit, PlanCreation, RuleRef, SplitType},
    params::CreatePlan,
    plan_lifecycle::PlanVersions,
    transport::RequestBody,
    ConsoleError,
};
use jiff::civil::date;
use rust_decimal::Decimal;
use serde_json::{json, Value};

fn version(id: u64, no: u32, active: bool) -> Value {
    json!({
        "planVersionId": id,
        "taskId": 42,
        "versionNo": no,
        "versionDate": "2025-11-01",
        "isActive": active,
    })
}

fn custom_split(split_count: u32, quantities: &[i64]) -> CreatePlan {
    CreatePlan {
        task_id: 42,
        version_date: date(2025, 11, 1),
        description: Some("Rebaseline".to_string()),
        creation: PlanCreation::DateRangeSplit(DateRangeSplit {
            start_date: date(2025, 11, 1),
            end_date: date(2025, 11, 30),
            total_qty: Decimal::from(quantities.iter().sum::<i64>().max(1)),
            split_type: SplitType::CustomSplit,
            split_count: Some(split_count),
            custom_quantities: Some(quantities.iter().copied().map(Decimal::from).collect()),
        }),
    }
}

fn single_line(planned_date: jiff::civil::Date) -> CreatePlan {
    CreatePlan {
        task_id: 42,
        version_date: date(2025, 11, 1),
        description: None,
        creation: PlanCreation::SingleLineQuick(DailyLine {
            planned_date,
            planned_qty: Decimal::from(25),
            description: None,
        }),
    }
}

fn rule_passed() -> Value {
    json!({ "valid": true, "message": "Validation passed" })
}

#[tokio::test]
async fn test_custom_split_mismatch_is_rejected_locally() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;

    let err = console
        .create_version(&custom_split(3, &[40, 60]))
        .await
        .expect_err("3 declared, 2 given");
    match err {
        ConsoleError::Validation { field, reason } => {
            assert_eq!(field, "customQuantities");
            assert!(reason.contains("3 period(s)"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(backend.requests().is_empty(), "no request may be sent");
}

#[tokio::test]
async fn test_create_sends_only_the_selected_mode() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    backend.ok(rule_passed());
    backend.ok(version(10, 1, false));

    let created = console
        .create_version(&single_line(date(2025, 11, 3)))
        .await
        .expect("create");
    assert_eq!(created.version_id, 10);
    assert_eq!(
        backend.calls(),
        vec![
            "POST /api/business-rules/validate-single",
            "POST /api/plans/create-with-mode"
        ]
    );

    let RequestBody::Json(body) = &backend.requests()[1].body else {
        panic!("expected JSON body");
    };
    assert_eq!(body["mode"], json!("SINGLE_LINE_QUICK"));
    assert!(body.get("singleLine").is_some());
    assert!(body.get("dailyLines").is_none());
    assert!(body.get("rangeSplit").is_none());
}

#[tokio::test]
async fn test_future_plan_date_stops_creation() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    let mut subscription = console.violations().subscribe();
    backend.respond(
        400,
        json!({
            "valid": false,
            "ruleNumber": 201,
            "message": "Start date cannot be in the future",
            "hint": "Choose today or an earlier date"
        }),
    );

    let err = console
        .create_version(&single_line(date(2025, 12, 24)))
        .await
        .expect_err("rule 201 must block creation");
    let violation = err.violation().expect("violation expected");
    assert_eq!(violation.rule, RuleRef::Server(201));
    assert_eq!(violation.hint.as_deref(), Some("Choose today or an earlier date"));
    assert_eq!(subscription.try_next().map(|v| v.rule), Some(RuleRef::Server(201)));

    assert_eq!(backend.calls(), vec!["POST /api/business-rules/validate-single"]);
    let RequestBody::Json(check) = &backend.requests()[0].body else {
        panic!("expected JSON body");
    };
    assert_eq!(check["ruleNumber"], json!(201));
    assert_eq!(check["context"]["taskId"], json!(42));
    assert_eq!(check["context"]["dates"], json!(["2025-12-24"]));
}

#[tokio::test]
async fn test_unavailable_rule_check_does_not_block_creation() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    backend.respond(500, json!({ "error": "Validation failed: engine offline" }));
    backend.ok(version(12, 3, false));

    let created = console
        .create_version(&single_line(date(2025, 11, 4)))
        .await
        .expect("create proceeds");
    assert_eq!(created.version_no, 3);
    assert_eq!(backend.remaining(), 0);
}

#[tokio::test]
async fn test_activate_refetches_and_one_version_is_active() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    backend.ok(json!({ "taskId": 42, "taskName": "Excavation" }));
    backend.ok(json!([version(11, 2, false), version(10, 1, true)]));

    let mut plans = PlanVersions::new(42);
    plans.load(&console).await.expect("load");
    assert_eq!(plans.active().map(|v| v.version_id), Some(10));

    backend.no_content();
    backend.ok(json!([version(11, 2, true), version(10, 1, false)]));
    plans.activate(&console, 11).await.expect("activate");

    assert_eq!(plans.active_count(), 1);
    assert_eq!(plans.active().map(|v| v.version_id), Some(11));
    assert_eq!(
        backend.calls()[2..],
        ["PUT /api/plans/11/activate", "GET /api/plans/task/42"]
    );
    assert!(plans.to_string().contains("v2 (2025-11-01) **active**"));
}

#[tokio::test]
async fn test_revert_refetches_task_and_versions() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;

    let mut plans = PlanVersions::new(42);
    backend.no_content();
    backend.ok(json!({ "taskId": 42, "taskName": "Excavation", "plannedQty": 100 }));
    backend.ok(json!([version(11, 2, false), version(10, 1, true)]));
    plans.revert(&console, 10).await.expect("revert");

    assert_eq!(
        backend.calls(),
        vec![
            "PUT /api/plans/10/revert",
            "GET /api/tasks/42",
            "GET /api/plans/task/42"
        ]
    );
    assert_eq!(plans.active().map(|v| v.version_no), Some(1));
    assert!(plans.task().is_some());
}

#[tokio::test]
async fn test_compare_returns_server_diff() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    backend.ok(json!({
        "version1": version(10, 1, false),
        "version2": version(11, 2, true),
        "comparisonLines": [
            { "plannedDate": "2025-11-03", "qtyVersion1": 10, "qtyVersion2": 12, "difference": 2, "status": "INCREASED" }
        ],
        "summary": { "commonDays": 1 }
    }));

    let plans = PlanVersions::new(42);
    let comparison = plans.compare(&console, 10, 11).await.expect("compare");
    assert_eq!(comparison.comparison_lines.len(), 1);
    assert_eq!(comparison.summary.common_days, 1);
    assert_eq!(backend.calls(), vec!["GET /api/plans/compare/10/11"]);
}
