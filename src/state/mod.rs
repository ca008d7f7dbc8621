//! Persisted UI state with two lifetimes.
//!
//! Durable entries survive restarts and are only ever overwritten. Session
//! entries live as long as the current session (for the binary: the process).
//! Each key is owned by exactly one feature; concurrent writers resolve by
//! last write wins.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Durable keys.
pub mod keys {
    /// Profile picture (owned by the profile editor).
    pub const PROFILE_PIC: &str = "profilePic";
    /// Display name (owned by the profile editor).
    pub const NICKNAME: &str = "nickname";
    /// Last update notice version the user opted out of.
    pub const DISMISSED_UPDATE_VERSION: &str = "dismissedUpdateVersion";

    /// Session flag set when the update notice was closed.
    pub const UPDATE_POPUP_CLOSED: &str = "updatePopupClosed";
    /// Last gallery page the user viewed.
    pub const CURRENT_PAGE: &str = "currentPage";
}

/// Errors raised by a state backend.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("State database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("State store lock poisoned")]
    Poisoned,
}

pub type StateResult<T> = Result<T, StateError>;

/// Key-value contract over durable and session storage.
///
/// Reads of missing keys return `Ok(None)`, which is distinct from an
/// empty string.
pub trait StateStore: Send + Sync {
    fn get_durable(&self, key: &str) -> StateResult<Option<String>>;
    fn set_durable(&self, key: &str, value: &str) -> StateResult<()>;
    fn get_session(&self, key: &str) -> StateResult<Option<String>>;
    fn set_session(&self, key: &str, value: &str) -> StateResult<()>;
}

/// Read a durable key, logging and swallowing backend failures.
pub fn durable_or_absent(store: &dyn StateStore, key: &str) -> Option<String> {
    store.get_durable(key).unwrap_or_else(|e| {
        tracing::warn!("Failed to read durable key {}: {}", key, e);
        None
    })
}

/// Read a session key, logging and swallowing backend failures.
pub fn session_or_absent(store: &dyn StateStore, key: &str) -> Option<String> {
    store.get_session(key).unwrap_or_else(|e| {
        tracing::warn!("Failed to read session key {}: {}", key, e);
        None
    })
}
