//! SQLite key-value table backing the session store.

use std::path::Path;

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{DatabaseResultExt, Result};

/// Database connection for session entries.
pub(crate) struct SessionDb {
    connection: Connection,
}

impl SessionDb {
    /// Opens the database and makes sure the schema exists.
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            Connection::open(path).db_context("Failed to open session database")?;
        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize session schema")
    }

    pub(crate) fn get(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM session_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to read session entry")
    }

    /// Writes all entries in one transaction.
    pub(crate) fn set_many(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to start transaction")?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO session_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .db_context("Failed to write session entry")?;
        }
        tx.commit().db_context("Failed to commit session entries")
    }

    pub(crate) fn clear(&self) -> Result<()> {
        self.connection
            .execute("DELETE FROM session_entries", [])
            .db_context("Failed to clear session entries")?;
        Ok(())
    }
}
