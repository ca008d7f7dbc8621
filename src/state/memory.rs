//! In-memory state store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{StateError, StateResult, StateStore};

/// Both lifetimes held in memory. Durable entries last as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    durable: RwLock<HashMap<String, String>>,
    session: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session, keeping durable entries.
    pub fn end_session(&self) -> StateResult<()> {
        self.session
            .write()
            .map_err(|_| StateError::Poisoned)?
            .clear();
        Ok(())
    }
}

fn read(map: &RwLock<HashMap<String, String>>, key: &str) -> StateResult<Option<String>> {
    let guard = map.read().map_err(|_| StateError::Poisoned)?;
    Ok(guard.get(key).cloned())
}

fn write(map: &RwLock<HashMap<String, String>>, key: &str, value: &str) -> StateResult<()> {
    let mut guard = map.write().map_err(|_| StateError::Poisoned)?;
    guard.insert(key.to_string(), value.to_string());
    Ok(())
}

impl StateStore for MemoryStore {
    fn get_durable(&self, key: &str) -> StateResult<Option<String>> {
        read(&self.durable, key)
    }

    fn set_durable(&self, key: &str, value: &str) -> StateResult<()> {
        write(&self.durable, key, value)
    }

    fn get_session(&self, key: &str) -> StateResult<Option<String>> {
        read(&self.session, key)
    }

    fn set_session(&self, key: &str, value: &str) -> StateResult<()> {
        write(&self.session, key, value)
    }
}
