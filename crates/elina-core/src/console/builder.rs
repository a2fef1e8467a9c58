//! Builder for creating and configuring Console instances.

use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use jiff::civil::Date;
use log::debug;

use super::Console;
use crate::{
    error::{ConsoleError, Result},
    session::SessionStore,
    transport::{ApiClient, HttpBackend, ReqwestBackend},
    violation::ViolationChannel,
};

/// Environment variable consulted when no base URL is given.
pub const BASE_URL_ENV: &str = "ELINA_API_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for creating and configuring Console instances.
#[derive(Clone, Default)]
pub struct ConsoleBuilder {
    base_url: Option<String>,
    session_path: Option<PathBuf>,
    timeout: Option<Duration>,
    backend: Option<Arc<dyn HttpBackend>>,
    violations: Option<ViolationChannel>,
    today: Option<Date>,
}

impl ConsoleBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL.
    ///
    /// If not specified, uses `$ELINA_API_BASE_URL` or
    /// `http://localhost:8080`.
    pub fn with_base_url<S: Into<String>>(mut self, url: Option<S>) -> Self {
        if let Some(url) = url {
            self.base_url = Some(url.into());
        }
        self
    }

    /// Sets a custom session database path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/elina/session.db` or `~/.local/share/elina/session.db`
    pub fn with_session_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.session_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the HTTP backend. The base URL and timeout are then unused.
    pub fn with_backend(mut self, backend: Arc<dyn HttpBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Shares an existing violation channel instead of creating one.
    pub fn with_violation_channel(mut self, channel: ViolationChannel) -> Self {
        self.violations = Some(channel);
        self
    }

    /// Pins the date treated as "today".
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    /// Builds the configured console instance.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::XdgDirectory` if no default session path can be
    /// derived, `ConsoleError::FileSystem` or `ConsoleError::Database` if the
    /// session store cannot be opened and `ConsoleError::Configuration` if
    /// the HTTP client cannot be built.
    pub async fn build(self) -> Result<Console> {
        let session_path = match self.session_path {
            Some(path) => path,
            None => Self::default_session_path()?,
        };
        let session = SessionStore::open(&session_path).await?;

        let backend = match self.backend {
            Some(backend) => backend,
            None => {
                let base_url = Self::resolve_base_url(self.base_url);
                debug!("Using backend at {base_url}");
                let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
                Arc::new(ReqwestBackend::new(base_url, timeout)?) as Arc<dyn HttpBackend>
            }
        };

        let violations = self.violations.unwrap_or_default();
        let client = ApiClient::new(backend, session, violations);
        Ok(Console::new(client, self.today))
    }

    /// Explicit value, then the environment, then the local default.
    fn resolve_base_url(explicit: Option<String>) -> String {
        explicit
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Returns the default session path following XDG Base Directory
    /// specification.
    fn default_session_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("elina")
            .place_data_file("session.db")
            .map_err(|e| ConsoleError::XdgDirectory(e.to_string()))
    }
}

impl std::fmt::Debug for ConsoleBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleBuilder")
            .field("base_url", &self.base_url)
            .field("session_path", &self.session_path)
            .field("timeout", &self.timeout)
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}
