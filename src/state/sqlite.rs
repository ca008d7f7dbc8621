//! SQLite-backed durable state.
//!
//! Durable entries go to a `durable_state` table; session entries are kept in
//! memory and vanish with the process.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};

use super::{StateError, StateResult, StateStore};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    session: RwLock<HashMap<String, String>>,
}

impl SqliteStore {
    /// Open (or create) the state database at `db_path`.
    pub fn open(db_path: &Path) -> StateResult<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Durable storage that lives only as long as this value.
    pub fn open_in_memory() -> StateResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StateResult<Self> {
        // WAL lets the page and the CLI read while another process writes
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(Duration::from_secs(5))?;

        let store = Self {
            conn: Mutex::new(conn),
            session: RwLock::new(HashMap::new()),
        };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StateResult<()> {
        let conn = self.conn.lock().map_err(|_| StateError::Poisoned)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS durable_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        )?;

        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn get_durable(&self, key: &str) -> StateResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StateError::Poisoned)?;

        let value = conn
            .query_row(
                "SELECT value FROM durable_state WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set_durable(&self, key: &str, value: &str) -> StateResult<()> {
        let conn = self.conn.lock().map_err(|_| StateError::Poisoned)?;

        conn.execute(
            r#"INSERT OR REPLACE INTO durable_state (key, value, updated_at)
               VALUES (?, ?, CURRENT_TIMESTAMP)"#,
            params![key, value],
        )?;

        Ok(())
    }

    fn get_session(&self, key: &str) -> StateResult<Option<String>> {
        let session = self.session.read().map_err(|_| StateError::Poisoned)?;
        Ok(session.get(key).cloned())
    }

    fn set_session(&self, key: &str, value: &str) -> StateResult<()> {
        let mut session = self.session.write().map_err(|_| StateError::Poisoned)?;
        session.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
