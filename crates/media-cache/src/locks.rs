//! Key-scoped mutual exclusion for cache writes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// One mutex per cache path. Concurrent resolutions of the same entry
/// serialize; different entries proceed in parallel.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `key`. Lock it and hold the guard for the
    /// check-then-generate sequence.
    pub fn slot(&self, key: &Path) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key.to_path_buf()).or_default().clone()
    }
}
