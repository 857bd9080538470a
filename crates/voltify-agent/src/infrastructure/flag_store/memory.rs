//! In-memory flag store.
//!
//! Used by tests, and by hosts that embed the agent and keep the active flag
//! in their own process instead of on disk.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

use crate::application::ports::{FlagError, FlagReader};

/// A [`FlagReader`] backed by a `HashMap`.
///
/// Writes go through `&self` so a store shared behind an `Arc` can be flipped
/// while the agent is running.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: RwLock<HashMap<String, bool>>,
    reads: AtomicU32,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `key` already set to `value`.
    pub fn with_flag(key: &str, value: bool) -> Self {
        let store = Self::new();
        store.set(key, value);
        store
    }

    pub fn set(&self, key: &str, value: bool) {
        self.flags
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), value);
    }

    pub fn remove(&self, key: &str) {
        self.flags.write().expect("lock poisoned").remove(key);
    }

    /// Number of `read_flag` calls served so far.
    pub fn read_count(&self) -> u32 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl FlagReader for MemoryFlagStore {
    fn read_flag(&self, key: &str) -> Result<Option<bool>, FlagError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let flags = self
            .flags
            .read()
            .map_err(|_| FlagError::Unavailable("flag map lock poisoned".into()))?;
        Ok(flags.get(key).copied())
    }
}
