//! Fixture key-state provider.
//!
//! Reports a caller-controlled set of keys as down.  Used by tests to get
//! deterministic modifier masks, and by the relay binary on hosts without a
//! native backend.

use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use keyevent_core::{KeyStateProvider, LogicalKey};

/// A [`KeyStateProvider`] whose answers are set by the caller.
pub struct FixtureKeyState {
    down: Mutex<HashSet<LogicalKey>>,
    queries: AtomicUsize,
}

impl FixtureKeyState {
    /// Creates a fixture with no key down.
    pub fn new() -> Self {
        Self::with_keys(&[])
    }

    /// Creates a fixture with `keys` down.
    pub fn with_keys(keys: &[LogicalKey]) -> Self {
        Self {
            down: Mutex::new(keys.iter().copied().collect()),
            queries: AtomicUsize::new(0),
        }
    }

    /// Marks `key` as down.
    pub fn press(&self, key: LogicalKey) {
        self.down.lock().expect("lock poisoned").insert(key);
    }

    /// Marks `key` as up.
    pub fn release(&self, key: LogicalKey) {
        self.down.lock().expect("lock poisoned").remove(&key);
    }

    /// Total number of `is_key_down` calls answered.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Default for FixtureKeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStateProvider for FixtureKeyState {
    fn is_key_down(&self, key: LogicalKey) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.down.lock().expect("lock poisoned").contains(&key)
    }
}
