//! Login, logout and session inspection.

use log::info;
use serde_json::json;

use super::Console;
use crate::{
    error::{ConsoleError, Result},
    models::{LoginResponse, Session, UserProfile},
    params::Login,
    transport::ApiRequest,
};

impl Console {
    /// Authenticates against the backend and stores the returned tokens
    /// and profile.
    pub async fn login(&self, params: &Login) -> Result<Session> {
        for (field, value) in [
            ("tenantCode", &params.tenant_code),
            ("email", &params.email),
            ("password", &params.password),
        ] {
            if value.trim().is_empty() {
                return Err(ConsoleError::validation(field).with_reason("must not be empty"));
            }
        }

        let request = ApiRequest::post("/api/auth/login").anonymous().json(&json!({
            "tenantCode": params.tenant_code,
            "email": params.email,
            "password": params.password,
        }))?;
        let response: LoginResponse = self.client.fetch(request).await?;
        self.session_store().save_login(&response).await?;
        info!("Logged in as {}", params.email);

        self.current_session().await
    }

    /// Forgets the stored credentials. Purely local.
    pub async fn logout(&self) -> Result<()> {
        self.session_store().clear().await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn current_session(&self) -> Result<Session> {
        self.session_store().load().await
    }

    /// Profile of the logged-in user, or `SessionTerminated` when nobody is.
    pub(crate) async fn require_user(&self) -> Result<UserProfile> {
        self.current_session()
            .await?
            .user
            .ok_or_else(|| ConsoleError::SessionTerminated {
                reason: "not logged in".to_string(),
            })
    }
}
