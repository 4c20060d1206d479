//! # Listview Store
//!
//! Best-effort persistence for view preferences (the saved filter set).
//!
//! Three backends share the [`PreferenceStore`] trait:
//!
//! - [`FilePreferenceStore`]: one JSON file, keys namespaced by prefix
//! - [`MemoryPreferenceStore`]: process-local, for tests and `--no-persist`
//! - [`DisabledPreferenceStore`]: always unavailable
//!
//! Nothing here is fatal. An unavailable store answers every read with `None`
//! and every write with `false`.

mod error;
mod file;
mod memory;
mod paths;
mod store;

pub use error::{Result, StoreError};
pub use file::{FilePreferenceStore, PREFS_SCHEMA_VERSION};
pub use memory::MemoryPreferenceStore;
pub use paths::{default_prefs_dir, PREFS_FILE_NAME};
pub use store::{DisabledPreferenceStore, PreferenceStore, StoredEntry, ENTRY_VERSION};
