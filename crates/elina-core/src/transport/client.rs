//! Session-aware API client.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{
    classify::{classify, login_failure, Outcome},
    ApiRequest, HttpBackend, RawResponse,
};
use crate::{
    error::{ConsoleError, Result},
    models::LoginResponse,
    session::SessionStore,
    violation::ViolationChannel,
};

const REFRESH_PATH: &str = "/api/auth/refresh";

/// Refreshes allowed per logical request.
const MAX_REFRESHES: u8 = 1;

/// Retry bookkeeping for one logical request. Lives on the caller's stack,
/// never on the client, so concurrent requests cannot see each other's
/// attempts.
#[derive(Debug, Clone, Copy, Default)]
struct RequestContext {
    refreshes: u8,
}

impl RequestContext {
    fn may_refresh(&self) -> bool {
        self.refreshes < MAX_REFRESHES
    }
}

/// Attaches credentials, recovers from one expired token per request,
/// classifies failures and publishes rule violations.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn HttpBackend>,
    session: SessionStore,
    violations: ViolationChannel,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        session: SessionStore,
        violations: ViolationChannel,
    ) -> Self {
        Self {
            backend,
            session,
            violations,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn violations(&self) -> &ViolationChannel {
        &self.violations
    }

    /// Sends `request` and returns the successful response.
    ///
    /// On the first 401 the stored refresh token is exchanged once and the
    /// request replayed. A failed refresh or a second 401 clears the session
    /// and yields `ConsoleError::SessionTerminated`. A business-rule
    /// violation is published on the violation channel and also returned.
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut context = RequestContext::default();
        loop {
            let mut outgoing = request.clone();
            if request.authenticated {
                outgoing.bearer = self.session.load().await?.token;
            }

            let response = self.backend.send(&outgoing).await?;
            match classify(&response) {
                Outcome::Success => return Ok(response),
                Outcome::Unauthorized if !request.authenticated => {
                    return Err(login_failure(&response));
                }
                Outcome::Unauthorized if context.may_refresh() => {
                    context.refreshes += 1;
                    debug!("{request} returned 401, refreshing token");
                    self.refresh().await?;
                }
                Outcome::Unauthorized => {
                    return Err(self
                        .terminate("request rejected after token refresh")
                        .await);
                }
                Outcome::Failure(error) => {
                    if let Some(violation) = error.violation() {
                        self.violations.publish(violation.clone());
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Sends `request` and decodes the JSON response body.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Sends `request`, discarding the response body.
    pub async fn execute(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await.map(|_| ())
    }

    async fn refresh(&self) -> Result<()> {
        let session = self.session.load().await?;
        let Some(refresh_token) = session.refresh_token else {
            return Err(self.terminate("no refresh token stored").await);
        };

        let request =
            ApiRequest::post(REFRESH_PATH).anonymous().json(&json!({ "refreshToken": refresh_token }))?;
        let response = match self.backend.send(&request).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                warn!("Token refresh rejected with status {}", response.status);
                return Err(self.terminate("token refresh rejected").await);
            }
            Err(e) => {
                warn!("Token refresh failed: {e}");
                return Err(self.terminate("token refresh failed").await);
            }
        };

        let Ok(tokens) = serde_json::from_str::<LoginResponse>(&response.body) else {
            return Err(self.terminate("token refresh returned an unreadable body").await);
        };
        self.session.save_login(&tokens).await?;
        info!("Access token refreshed");
        Ok(())
    }

    /// Clears stored credentials and builds the terminal error.
    async fn terminate(&self, reason: &str) -> ConsoleError {
        if let Err(e) = self.session.clear().await {
            warn!("Failed to clear session: {e}");
        }
        info!("Session terminated: {reason}");
        ConsoleError::SessionTerminated {
            reason: reason.to_string(),
        }
    }
}
