use crate::error::{Result, StoreError};
use crate::paths::PREFS_FILE_NAME;
use crate::store::{PreferenceStore, StoredEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const PREFS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedPreferences {
    schema_version: u32,
    entries: BTreeMap<String, StoredEntry>,
}

/// JSON-file-backed store. Keys are namespaced with a prefix inside the file,
/// so several listing pages can share one preferences file.
///
/// The whole file is rewritten (temp file + rename) on every mutation.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    prefix: String,
    available: bool,
    entries: Mutex<BTreeMap<String, StoredEntry>>,
}

impl FilePreferenceStore {
    /// Opens the store under `dir`. Never fails: if the directory is not
    /// writable, the store reports itself unavailable and every operation
    /// returns its sentinel. A file that cannot be decoded is renamed to
    /// `preferences.json.corrupt` and the store starts empty.
    pub fn open(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        let dir = dir.as_ref();
        let prefix = prefix.into();
        match Self::try_open(dir, prefix.clone()) {
            Ok(store) => store,
            Err(err) => {
                log::warn!(
                    "Preferences unavailable at {}: {err}; filters will not persist",
                    dir.display()
                );
                Self {
                    path: dir.join(PREFS_FILE_NAME),
                    prefix,
                    available: false,
                    entries: Mutex::new(BTreeMap::new()),
                }
            }
        }
    }

    pub fn try_open(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref();
        probe_writable(dir)?;
        let path = dir.join(PREFS_FILE_NAME);
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match decode(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    set_aside(&path, &err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!("Opened preferences {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path,
            prefix: prefix.into(),
            available: true,
            entries: Mutex::new(entries),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, StoredEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn mutate(&self, op: &str, apply: impl FnOnce(&mut BTreeMap<String, StoredEntry>)) -> bool {
        if !self.available {
            return false;
        }
        let mut entries = self.entries();
        let mut next = entries.clone();
        apply(&mut next);
        match write_atomically(&self.path, &next) {
            Ok(()) => {
                *entries = next;
                true
            }
            Err(err) => {
                log::error!("Failed to {op} preferences at {}: {err}", self.path.display());
                false
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn is_available(&self) -> bool {
        self.available
    }

    fn get_entry(&self, key: &str) -> Option<StoredEntry> {
        if !self.available {
            return None;
        }
        self.entries().get(&self.prefixed(key)).cloned()
    }

    fn put_entry(&self, key: &str, entry: StoredEntry) -> bool {
        let key = self.prefixed(key);
        self.mutate("write", |entries| {
            entries.insert(key, entry);
        })
    }

    fn remove(&self, key: &str) -> bool {
        let key = self.prefixed(key);
        self.mutate("remove", |entries| {
            entries.remove(&key);
        })
    }

    fn keys(&self) -> Vec<String> {
        if !self.available {
            return Vec::new();
        }
        self.entries()
            .keys()
            .filter_map(|key| key.strip_prefix(self.prefix.as_str()))
            .map(str::to_string)
            .collect()
    }

    /// Removes only this store's prefixed keys.
    fn clear(&self) -> bool {
        let prefix = self.prefix.clone();
        self.mutate("clear", |entries| {
            entries.retain(|key, _| !key.starts_with(prefix.as_str()));
        })
    }
}

fn decode(bytes: &[u8]) -> Result<BTreeMap<String, StoredEntry>> {
    let persisted: PersistedPreferences = serde_json::from_slice(bytes)?;
    if persisted.schema_version != PREFS_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: persisted.schema_version,
            expected: PREFS_SCHEMA_VERSION,
        });
    }
    Ok(persisted.entries)
}

/// Moves an undecodable preferences file out of the way; the next write
/// starts a fresh one.
fn set_aside(path: &Path, err: &StoreError) {
    let corrupt = path.with_extension("json.corrupt");
    match std::fs::rename(path, &corrupt) {
        Ok(()) => log::warn!(
            "Ignoring unreadable preferences ({err}); moved to {}",
            corrupt.display()
        ),
        Err(rename_err) => log::warn!(
            "Ignoring unreadable preferences at {} ({err}); could not move it: {rename_err}",
            path.display()
        ),
    }
}

fn probe_writable(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let probe = dir.join(".__storage_test__");
    std::fs::write(&probe, b"probe")?;
    std::fs::remove_file(&probe)?;
    Ok(())
}

fn write_atomically(path: &Path, entries: &BTreeMap<String, StoredEntry>) -> Result<()> {
    let persisted = PersistedPreferences {
        schema_version: PREFS_SCHEMA_VERSION,
        entries: entries.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&persisted)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn values_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let store = FilePreferenceStore::open(tmp.path(), "listview_");
        assert!(store.is_available());
        assert!(store.set("filters", json!({"type": "Training"})));

        let reopened = FilePreferenceStore::open(tmp.path(), "listview_");
        assert_eq!(reopened.get("filters"), Some(json!({"type": "Training"})));
        assert_eq!(reopened.keys(), vec!["filters".to_string()]);
    }

    #[test]
    fn prefixes_isolate_pages() {
        let tmp = TempDir::new().unwrap();
        let jobs = FilePreferenceStore::open(tmp.path(), "jobs_");
        assert!(jobs.set("filters", json!({"search": "nurse"})));

        let directory = FilePreferenceStore::open(tmp.path(), "directory_");
        assert_eq!(directory.get("filters"), None);
        assert!(directory.set("filters", json!({"category": "Gold"})));
        assert!(directory.clear());

        let jobs = FilePreferenceStore::open(tmp.path(), "jobs_");
        assert_eq!(jobs.get("filters"), Some(json!({"search": "nurse"})));
    }

    #[test]
    fn unreadable_location_degrades_to_unavailable() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let store = FilePreferenceStore::open(&blocker, "listview_");
        assert!(!store.is_available());
        assert!(!store.set("filters", json!({})));
        assert_eq!(store.get("filters"), None);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn corrupted_file_is_set_aside_and_replaced() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(PREFS_FILE_NAME), "{oops").unwrap();

        let store = FilePreferenceStore::open(tmp.path(), "x_");
        assert!(store.is_available());
        assert_eq!(store.get("filters"), None);
        assert!(store.set("filters", json!({"search": "nurse"})));
        assert!(store.clear());
        assert!(store.set("filters", json!({"search": "welder"})));
        assert!(tmp.path().join("preferences.json.corrupt").exists());

        let reopened = FilePreferenceStore::open(tmp.path(), "x_");
        assert_eq!(reopened.get("filters"), Some(json!({"search": "welder"})));
    }

    #[test]
    fn unknown_schema_version_starts_fresh() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(PREFS_FILE_NAME),
            r#"{"schema_version": 99, "entries": {}}"#,
        )
        .unwrap();

        let store = FilePreferenceStore::try_open(tmp.path(), "x_").expect("recovers");
        assert!(store.keys().is_empty());
        assert!(store.set("filters", json!({})));
    }
}
