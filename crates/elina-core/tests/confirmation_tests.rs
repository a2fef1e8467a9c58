mod common;

use common::{create_test_console, ScriptedBackend, TODAY};
use elina_core::{
    confirmation::{ConfirmationWorkflow, LockBanner},
    console::{PERMISSION_CONFIRM, PERMISSION_UNDO_CONFIRMATION},
    models::RuleRef,
    staged::{CommitOutcome, StagePhase},
    ConsoleError, GlobalViolationListener,
};
use jiff::civil::date;
use rust_decimal::Decimal;
use serde_json::{json, Value};

fn summary(lock_date: Option<&str>, preview: Option<(&str, i64)>) -> Value {
    let mut body = json!({
        "wbsId": 1,
        "wbsName": "Foundations",
        "plannedQty": 100,
        "actualQty": 60,
        "confirmedQtyToDate": 40,
        "variance": -40,
        "lockDate": lock_date,
    });
    if let Some((date, qty)) = preview {
        body["previewDate"] = json!(date);
        body["previewActualQty"] = json!(qty);
    }
    body
}

fn confirmation(id: u64, date: &str, created_on: &str) -> Value {
    json!({
        "confirmationId": id,
        "entityId": 1,
        "confirmationDate": date,
        "confirmedQty": 40,
        "createdOn": created_on,
    })
}

#[tokio::test]
async fn test_preview_is_repeatable_and_creates_nothing() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[PERMISSION_CONFIRM]).await;
    let mut workflow = ConfirmationWorkflow::new(1, TODAY);

    for _ in 0..2 {
        backend.ok(summary(None, Some(("2025-11-04", 55))));
        let preview = workflow
            .select_date(&console, date(2025, 11, 4), None)
            .await
            .expect("preview");
        assert_eq!(preview.preview_actual_qty, Some(Decimal::from(55)));
    }

    assert_eq!(workflow.phase(), StagePhase::Previewed);
    for request in backend.requests() {
        assert_eq!(request.path, "/api/confirmations/wbs/1/summary");
        assert_eq!(
            request.query,
            vec![("previewDate".to_string(), "2025-11-04".to_string())]
        );
    }
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn test_freeze_requires_arming() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[PERMISSION_CONFIRM]).await;
    let mut workflow = ConfirmationWorkflow::new(1, TODAY);

    backend.ok(summary(None, Some(("2025-11-04", 55))));
    workflow
        .select_date(&console, date(2025, 11, 4), Some("week 44".to_string()))
        .await
        .expect("preview");

    // not armed yet
    assert!(workflow.commit(&console).await.is_err());

    let prompt = workflow.arm().expect("arm");
    assert_eq!(prompt.confirmation_date, date(2025, 11, 4));
    assert_eq!(prompt.quantity, Decimal::from(55));

    backend.ok(confirmation(9, "2025-11-04", "2025-11-05T09:00:00"));
    backend.ok(summary(Some("2025-11-04"), None));
    backend.ok(json!([confirmation(9, "2025-11-04", "2025-11-05T09:00:00")]));

    let outcome = workflow.commit(&console).await.expect("commit");
    assert!(matches!(outcome, CommitOutcome::Committed(ref c) if c.confirmation_id == 9));
    assert_eq!(workflow.phase(), StagePhase::Idle);
    assert_eq!(workflow.history().len(), 1);
    assert_eq!(
        workflow.lock_banner(),
        LockBanner::Informational(date(2025, 11, 4))
    );
    assert_eq!(
        backend.calls()[1..],
        [
            "POST /api/confirmations/wbs/1",
            "GET /api/confirmations/wbs/1/summary",
            "GET /api/confirmations/wbs/1"
        ]
    );
}

#[tokio::test]
async fn test_future_date_violation_reaches_the_listener() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[PERMISSION_CONFIRM]).await;
    let mut listener = GlobalViolationListener::mount(console.violations());
    let mut workflow = ConfirmationWorkflow::new(1, date(2025, 11, 1));

    backend.ok(summary(None, Some(("2025-11-10", 0))));
    workflow
        .select_date(&console, date(2025, 11, 10), None)
        .await
        .expect("preview");
    workflow.arm().expect("arm");

    backend.violation(301, "Confirmation date cannot be in the future");
    let outcome = workflow.commit(&console).await.expect("violation is not a failure");
    let CommitOutcome::Violation(violation) = outcome else {
        panic!("expected a violation");
    };
    assert_eq!(violation.rule, RuleRef::Server(301));

    assert!(listener.poll());
    assert_eq!(
        listener.display().current().map(|v| v.message.as_str()),
        Some("Confirmation date cannot be in the future")
    );

    // the form stays usable: the preview is kept and can be re-armed
    assert_eq!(workflow.phase(), StagePhase::Previewed);
    assert!(workflow.arm().is_ok());
    listener.unmount();
}

#[tokio::test]
async fn test_confirm_without_permission_sends_nothing() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    let mut workflow = ConfirmationWorkflow::new(1, TODAY);

    backend.ok(summary(None, Some(("2025-11-04", 10))));
    workflow
        .select_date(&console, date(2025, 11, 4), None)
        .await
        .expect("preview");
    workflow.arm().expect("arm");

    let err = workflow.commit(&console).await.expect_err("denied");
    assert!(matches!(err, ConsoleError::AuthorizationDenied { .. }));
    assert_eq!(backend.requests().len(), 1);
    assert!(!workflow.can_confirm(&console).await.expect("permission"));
}

#[tokio::test]
async fn test_undo_only_latest_with_admin_permission() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(
        backend.clone(),
        &[PERMISSION_CONFIRM, PERMISSION_UNDO_CONFIRMATION],
    )
    .await;
    let mut workflow = ConfirmationWorkflow::new(1, TODAY);

    backend.ok(summary(Some("2025-11-06"), None));
    backend.ok(json!([
        confirmation(3, "2025-10-31", "2025-11-01T08:00:00"),
        confirmation(4, "2025-11-06", "2025-11-06T08:00:00")
    ]));
    workflow.load(&console).await.expect("load");
    assert!(workflow.lock_banner().is_blocking());
    assert_eq!(workflow.latest().map(|c| c.confirmation_id), Some(4));

    let err = workflow.undo(&console, 3).await.expect_err("not latest");
    assert!(matches!(err, ConsoleError::Validation { .. }));
    assert_eq!(backend.requests().len(), 2);

    backend.no_content();
    backend.ok(summary(Some("2025-10-31"), None));
    backend.ok(json!([confirmation(3, "2025-10-31", "2025-11-01T08:00:00")]));
    workflow.undo(&console, 4).await.expect("undo");
    assert_eq!(backend.calls()[2], "DELETE /api/confirmations/4");
    assert_eq!(workflow.history().len(), 1);
    assert!(!workflow.lock_banner().is_blocking());
}

#[tokio::test]
async fn test_undo_without_admin_permission_is_denied() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[PERMISSION_CONFIRM]).await;
    let mut workflow = ConfirmationWorkflow::new(1, TODAY);

    backend.ok(summary(None, None));
    backend.ok(json!([confirmation(4, "2025-11-03", "2025-11-03T08:00:00")]));
    workflow.load(&console).await.expect("load");

    assert!(!workflow.can_undo(&console).await.expect("permission"));
    let err = workflow.undo(&console, 4).await.expect_err("denied");
    assert!(matches!(err, ConsoleError::AuthorizationDenied { .. }));
    assert_eq!(backend.requests().len(), 2);
}
