//! Persistent session store.
//!
//! The only client-side state that survives a run: access token, refresh
//! token, user profile and tenant info. Entries live in a small SQLite
//! key-value table. Every operation opens its own connection inside
//! `spawn_blocking`, so the store can be shared freely between tasks.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use crate::{
    error::{ConsoleError, Result},
    models::{LoginResponse, Session, TenantInfo, UserProfile},
};

mod db;

use db::SessionDb;

const TOKEN_KEY: &str = "token";
const REFRESH_TOKEN_KEY: &str = "refreshToken";
const USER_KEY: &str = "user";
const TENANT_KEY: &str = "tenantInfo";

/// Handle to the on-disk session entries.
#[derive(Debug, Clone)]
pub struct SessionStore {
    db_path: PathBuf,
}

impl SessionStore {
    /// Opens (creating if needed) the session database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FileSystem` if the parent directory cannot be
    /// created and `ConsoleError::Database` if the schema cannot be applied.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConsoleError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let store = Self { db_path };
        store.with_db(|_| Ok(())).await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn with_db<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SessionDb) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = SessionDb::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(|e| ConsoleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Reads the stored session. Corrupt profile entries are treated as
    /// absent.
    pub async fn load(&self) -> Result<Session> {
        self.with_db(|db| {
            let user = db
                .get(USER_KEY)?
                .and_then(|raw| serde_json::from_str::<UserProfile>(&raw).ok());
            let tenant = db
                .get(TENANT_KEY)?
                .and_then(|raw| serde_json::from_str::<TenantInfo>(&raw).ok());
            Ok(Session {
                token: db.get(TOKEN_KEY)?,
                refresh_token: db.get(REFRESH_TOKEN_KEY)?,
                user,
                tenant,
            })
        })
        .await
    }

    /// Persists a login or refresh response. Profile entries are only
    /// overwritten when the response carries them.
    pub async fn save_login(&self, response: &LoginResponse) -> Result<()> {
        let mut entries = vec![
            (TOKEN_KEY, response.token.clone()),
            (REFRESH_TOKEN_KEY, response.refresh_token.clone()),
        ];
        if let Some(user) = &response.user_profile {
            entries.push((USER_KEY, serde_json::to_string(user)?));
        }
        if let Some(tenant) = &response.tenant_info {
            entries.push((TENANT_KEY, serde_json::to_string(tenant)?));
        }

        self.with_db(move |db| db.set_many(&entries)).await?;
        debug!("Session credentials stored");
        Ok(())
    }

    /// Removes every stored entry.
    pub async fn clear(&self) -> Result<()> {
        self.with_db(|db| db.clear()).await?;
        debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn login_response() -> LoginResponse {
        LoginResponse {
            token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            user_profile: Some(UserProfile {
                id: 7,
                email: "site@elina.test".to_string(),
                permissions: vec!["PAGE_CONFIRMATION_EDIT".to_string()],
                ..Default::default()
            }),
            tenant_info: Some(TenantInfo {
                id: 1,
                tenant_code: "ACME".to_string(),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::open(temp_dir.path().join("nested/session.db"))
            .await
            .expect("Failed to open store");

        assert_eq!(store.load().await.expect("load"), Session::default());

        store.save_login(&login_response()).await.expect("save");
        let session = store.load().await.expect("load");
        assert!(session.is_authenticated());
        assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(session.tenant.map(|t| t.tenant_code), Some("ACME".to_string()));
    }

    #[tokio::test]
    async fn test_refresh_keeps_profile() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::open(temp_dir.path().join("session.db"))
            .await
            .expect("Failed to open store");
        store.save_login(&login_response()).await.expect("save");

        store
            .save_login(&LoginResponse {
                token: "access-2".to_string(),
                refresh_token: "refresh-2".to_string(),
                user_profile: None,
                tenant_info: None,
            })
            .await
            .expect("save refreshed tokens");

        let session = store.load().await.expect("load");
        assert_eq!(session.token.as_deref(), Some("access-2"));
        assert_eq!(session.user.map(|u| u.id), Some(7));
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::open(temp_dir.path().join("session.db"))
            .await
            .expect("Failed to open store");
        store.save_login(&login_response()).await.expect("save");

        store.clear().await.expect("clear");
        assert_eq!(store.load().await.expect("load"), Session::default());
    }
}
