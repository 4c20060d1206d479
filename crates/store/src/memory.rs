use crate::store::{PreferenceStore, StoredEntry};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-local store. Always available, forgotten on exit.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, StoredEntry>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, StoredEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn is_available(&self) -> bool {
        true
    }

    fn get_entry(&self, key: &str) -> Option<StoredEntry> {
        self.entries().get(key).cloned()
    }

    fn put_entry(&self, key: &str, entry: StoredEntry) -> bool {
        self.entries().insert(key.to_string(), entry);
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries().remove(key);
        true
    }

    fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    fn clear(&self) -> bool {
        self.entries().clear();
        true
    }
}
