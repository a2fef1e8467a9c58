#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use elina_core::{
    models::{LoginResponse, UserProfile},
    transport::{ApiRequest, HttpBackend, RawResponse},
    Console, ConsoleBuilder, ConsoleError,
};
use jiff::civil::{date, Date};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Fixed "today" for every test console.
pub const TODAY: Date = date(2025, 11, 5);

/// Backend that replays queued responses and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(RawResponse::new(status, body.to_string()));
    }

    pub fn ok(&self, body: Value) {
        self.respond(200, body);
    }

    pub fn no_content(&self) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(RawResponse::new(204, ""));
    }

    pub fn violation(&self, rule_number: i32, message: &str) {
        self.respond(
            400,
            json!({
                "type": "BUSINESS_RULE_VIOLATION",
                "ruleNumber": rule_number,
                "message": message,
                "hint": "Contact your administrator",
            }),
        );
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Every request as "METHOD path".
    pub fn calls(&self) -> Vec<String> {
        self.requests().iter().map(ToString::to_string).collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().expect("responses lock").len()
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn send(&self, request: &ApiRequest) -> elina_core::Result<RawResponse> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .ok_or_else(|| ConsoleError::Network {
                message: format!("no scripted response for {request}"),
                source: None,
            })
    }
}

pub fn login_response(permissions: &[&str]) -> LoginResponse {
    LoginResponse {
        token: "access-1".to_string(),
        refresh_token: "refresh-1".to_string(),
        user_profile: Some(UserProfile {
            id: 7,
            email: "site@acme.test".to_string(),
            full_name: Some("Site Engineer".to_string()),
            permissions: permissions.iter().map(ToString::to_string).collect(),
            ..UserProfile::default()
        }),
        tenant_info: None,
    }
}

/// Console over `backend` with a logged-in session holding `permissions`.
pub async fn create_test_console(
    backend: Arc<ScriptedBackend>,
    permissions: &[&str],
) -> (TempDir, Console) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let console = ConsoleBuilder::new()
        .with_session_path(Some(temp_dir.path().join("session.db")))
        .with_backend(backend)
        .with_today(TODAY)
        .build()
        .await
        .expect("Failed to create console");
    console
        .session_store()
        .save_login(&login_response(permissions))
        .await
        .expect("Failed to store session");
    (temp_dir, console)
}

pub fn row(date: &str, planned: i64, actual: i64) -> Value {
    json!({
        "updateDate": date,
        "planQty": planned,
        "actualQty": actual,
        "isLocked": false,
        "canEdit": true,
    })
}
