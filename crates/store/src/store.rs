use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Version tag written into every stored envelope.
pub const ENTRY_VERSION: &str = "1.0";

/// What is actually persisted under a key: the value plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: Value,
    /// RFC 3339 write time
    pub timestamp: String,
    pub version: String,
    /// Unix milliseconds after which the entry reads as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

impl StoredEntry {
    #[must_use]
    pub fn new(value: Value, ttl: Option<Duration>) -> Self {
        let now = Utc::now();
        let expiry = ttl.map(|ttl| {
            let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
            now.timestamp_millis().saturating_add(ttl_ms)
        });
        Self {
            value,
            timestamp: now.to_rfc3339(),
            version: ENTRY_VERSION.to_string(),
            expiry,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expiry
            .is_some_and(|expiry| Utc::now().timestamp_millis() > expiry)
    }
}

/// Best-effort key-value persistence for view preferences.
///
/// Every operation degrades instead of failing: when the backing store is
/// unavailable, reads return `None`, writes return `false` and the caller keeps
/// working purely in memory.
pub trait PreferenceStore: Send + Sync {
    fn is_available(&self) -> bool;

    fn get_entry(&self, key: &str) -> Option<StoredEntry>;

    fn put_entry(&self, key: &str, entry: StoredEntry) -> bool;

    fn remove(&self, key: &str) -> bool;

    /// Keys currently stored, without any backend prefix.
    fn keys(&self) -> Vec<String>;

    fn clear(&self) -> bool;

    /// Reads a value. Expired entries are removed and read as absent.
    fn get(&self, key: &str) -> Option<Value> {
        let entry = self.get_entry(key)?;
        if entry.is_expired() {
            self.remove(key);
            return None;
        }
        Some(entry.value)
    }

    fn set(&self, key: &str, value: Value) -> bool {
        self.put_entry(key, StoredEntry::new(value, None))
    }

    fn set_with_expiry(&self, key: &str, value: Value, ttl: Duration) -> bool {
        self.put_entry(key, StoredEntry::new(value, Some(ttl)))
    }
}

/// A store that is never available: filters live for the session only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPreferenceStore;

impl PreferenceStore for DisabledPreferenceStore {
    fn is_available(&self) -> bool {
        false
    }

    fn get_entry(&self, _key: &str) -> Option<StoredEntry> {
        None
    }

    fn put_entry(&self, _key: &str, _entry: StoredEntry) -> bool {
        false
    }

    fn remove(&self, _key: &str) -> bool {
        false
    }

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn clear(&self) -> bool {
        false
    }
}
