mod common;

use common::{create_test_console, ScriptedBackend};
use elina_core::{
    error::ACCESS_DENIED_MESSAGE,
    models::{DayWiseBatch, DayWiseEntry, RuleRef},
    params::{Id, ListProjects, Login},
    ConsoleError,
};
use jiff::civil::date;
use rust_decimal::Decimal;
use serde_json::json;

fn one_entry_batch() -> DayWiseBatch {
    DayWiseBatch {
        task_id: 42,
        updates: vec![DayWiseEntry {
            update_date: date(2025, 11, 3),
            plan_qty: Decimal::from(10),
            actual_qty: Decimal::from(8),
            remarks: None,
        }],
    }
}

#[tokio::test]
async fn test_refresh_then_replay_succeeds() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;

    backend.respond(401, json!({}));
    backend.ok(json!({ "token": "access-2", "refreshToken": "refresh-2" }));
    backend.ok(json!([{ "projectId": 1, "name": "Metro Line" }]));

    let projects = console
        .list_projects(&ListProjects::default())
        .await
        .expect("Failed to list projects");
    assert_eq!(projects.len(), 1);

    let requests = backend.requests();
    assert_eq!(
        backend.calls(),
        vec![
            "GET /api/projects",
            "POST /api/auth/refresh",
            "GET /api/projects"
        ]
    );
    assert_eq!(requests[0].bearer.as_deref(), Some("access-1"));
    assert_eq!(requests[1].bearer, None);
    assert_eq!(requests[2].bearer.as_deref(), Some("access-2"));

    let session = console.current_session().await.expect("session");
    assert_eq!(session.token.as_deref(), Some("access-2"));
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-2"));
    assert!(session.user.is_some(), "profile survives a refresh");
}

#[tokio::test]
async fn test_second_unauthorized_terminates_session() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;

    backend.respond(401, json!({}));
    backend.ok(json!({ "token": "access-2", "refreshToken": "refresh-2" }));
    backend.respond(401, json!({}));

    let err = console
        .get_project(&Id { id: 1 })
        .await
        .expect_err("second 401 must not succeed");
    assert!(err.is_session_terminated());

    // exactly one refresh, no third attempt
    assert_eq!(
        backend
            .calls()
            .iter()
            .filter(|call| call.as_str() == "POST /api/auth/refresh")
            .count(),
        1
    );
    assert_eq!(backend.requests().len(), 3);

    let session = console.current_session().await.expect("session");
    assert!(!session.is_authenticated());
    assert_eq!(session.refresh_token, None);
}

#[tokio::test]
async fn test_failed_refresh_terminates_session() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;

    backend.respond(401, json!({}));
    backend.respond(401, json!({ "message": "refresh token expired" }));

    let err = console
        .list_tasks(&Id { id: 3 })
        .await
        .expect_err("refresh failure must end the session");
    assert!(matches!(err, ConsoleError::SessionTerminated { .. }));
    assert_eq!(backend.requests().len(), 2);
    assert_eq!(
        console.current_session().await.expect("session").token,
        None
    );
}

#[tokio::test]
async fn test_missing_refresh_token_terminates_without_request() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    console.logout().await.expect("logout");

    backend.respond(401, json!({}));

    let err = console
        .get_task(&Id { id: 9 })
        .await
        .expect_err("no refresh token");
    assert!(err.is_session_terminated());
    assert_eq!(backend.calls(), vec!["GET /api/tasks/9"]);
}

#[tokio::test]
async fn test_forbidden_uses_default_message() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;

    backend.respond(403, json!({}));
    match console.get_wbs(&Id { id: 5 }).await {
        Err(ConsoleError::AuthorizationDenied { message }) => {
            assert_eq!(message, ACCESS_DENIED_MESSAGE);
        }
        other => panic!("expected authorization denial, got {other:?}"),
    }

    backend.respond(403, json!({ "message": "Only planners may do this" }));
    let err = console.get_wbs(&Id { id: 5 }).await.expect_err("403");
    assert_eq!(err.to_string(), "Only planners may do this");

    // a 403 never triggers a refresh and keeps the session
    assert!(!backend.calls().iter().any(|c| c.contains("refresh")));
    assert!(console
        .current_session()
        .await
        .expect("session")
        .is_authenticated());
}

#[tokio::test]
async fn test_violation_is_published_and_returned() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    let mut subscription = console.violations().subscribe();

    backend.violation(101, "Backdated entries beyond 7 days are not allowed");
    let err = console
        .save_day_wise(&one_entry_batch())
        .await
        .expect_err("violation");

    let returned = err.violation().cloned().expect("violation error");
    assert_eq!(returned.rule, RuleRef::Server(101));
    assert_eq!(
        returned.message,
        "Backdated entries beyond 7 days are not allowed"
    );

    let published = subscription.try_next().expect("published violation");
    assert_eq!(published, returned);
    assert!(subscription.try_next().is_none(), "published exactly once");
}

#[tokio::test]
async fn test_violation_without_subscriber_is_dropped() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    assert_eq!(console.violations().subscriber_count(), 0);

    backend.violation(202, "Lock date reached");
    let err = console
        .save_day_wise(&one_entry_batch())
        .await
        .expect_err("violation");
    assert!(matches!(err, ConsoleError::RuleViolation(_)));

    // a subscriber mounted afterwards sees nothing
    let mut late = console.violations().subscribe();
    assert!(late.try_next().is_none());
}

#[tokio::test]
async fn test_login_failure_does_not_refresh() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    console.logout().await.expect("logout");

    backend.respond(401, json!({ "message": "Invalid email or password" }));
    let err = console
        .login(&Login {
            tenant_code: "ACME".to_string(),
            email: "site@acme.test".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("login must fail");
    match err {
        ConsoleError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(backend.calls(), vec!["POST /api/auth/login"]);
    assert_eq!(backend.requests()[0].bearer, None);
    assert_eq!(backend.remaining(), 0);
}

#[tokio::test]
async fn test_login_stores_session() {
    let backend = ScriptedBackend::new();
    let (_temp_dir, console) = create_test_console(backend.clone(), &[]).await;
    console.logout().await.expect("logout");

    backend.ok(json!({
        "token": "fresh",
        "refreshToken": "fresh-refresh",
        "userProfile": { "id": 3, "email": "pm@acme.test", "permissions": ["PAGE_CONFIRMATION_EDIT"] },
        "tenantInfo": { "id": 1, "tenantCode": "ACME" }
    }));
    let session = console
        .login(&Login {
            tenant_code: "ACME".to_string(),
            email: "pm@acme.test".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("login");
    assert!(session.is_authenticated());
    assert_eq!(session.token.as_deref(), Some("fresh"));

    // an empty field is rejected before any request
    let err = console
        .login(&Login {
            tenant_code: " ".to_string(),
            email: "pm@acme.test".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect_err("empty tenant");
    assert!(matches!(err, ConsoleError::Validation { .. }));
    assert_eq!(backend.requests().len(), 1);
}
