use std::path::PathBuf;

pub const PREFS_DIR_NAME: &str = "listview";
pub const LOCAL_PREFS_DIR_NAME: &str = ".listview";
pub const PREFS_FILE_NAME: &str = "preferences.json";

/// Platform data dir (e.g. `~/.local/share/listview`), or `./.listview` when
/// the platform has none.
#[must_use]
pub fn default_prefs_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(LOCAL_PREFS_DIR_NAME),
        |dir| dir.join(PREFS_DIR_NAME),
    )
}
