use anyhow::{anyhow, Context, Result};
use listview_records::CollectionKind;
use listview_search::{page_size, OrderingRule, PageMode, DEFAULT_PAGE_SIZE};
use listview_session::{SessionConfig, DEFAULT_PREFERENCE_KEY, MIN_SEARCH_DEBOUNCE};
use listview_store::default_prefs_dir;
use serde::Deserialize;
use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File picked up from the working directory when `--config` is absent.
pub(crate) const CONFIG_FILE_NAME: &str = "listview.toml";

pub(crate) const DEFAULT_KEY_PREFIX: &str = "listview_";

const ENV_PAGE_SIZE: &str = "LISTVIEW_PAGE_SIZE";
const ENV_PREFS_DIR: &str = "LISTVIEW_PREFS_DIR";
const ENV_DEBOUNCE_MS: &str = "LISTVIEW_DEBOUNCE_MS";

/// How long a fetched collection stays usable as a fallback.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// `listview.toml` as written on disk. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    source: Option<String>,
    kind: Option<String>,
    page_size: Option<usize>,
    page_mode: Option<String>,
    ordering: Option<String>,
    debounce_ms: Option<u64>,
    prefs_dir: Option<PathBuf>,
    key_prefix: Option<String>,
    preference_key: Option<String>,
    fallback: Option<PathBuf>,
    cache_minutes: Option<u64>,
}

/// Effective settings after file, environment and flags were merged
/// (later sources win).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub source: Option<String>,
    pub kind: CollectionKind,
    pub page_size: NonZeroUsize,
    pub page_mode: PageMode,
    /// `None` means the kind's own rule
    pub ordering: Option<OrderingRule>,
    pub debounce: Duration,
    pub prefs_dir: PathBuf,
    pub key_prefix: String,
    pub preference_key: String,
    /// Collection shown when the source fails and nothing is cached
    pub fallback: Option<PathBuf>,
    /// Zero disables caching
    pub cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: None,
            kind: CollectionKind::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page_mode: PageMode::Cumulative,
            ordering: None,
            debounce: MIN_SEARCH_DEBOUNCE,
            prefs_dir: default_prefs_dir(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            preference_key: DEFAULT_PREFERENCE_KEY.to_string(),
            fallback: None,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl Settings {
    /// Reads the explicit config file, or `listview.toml` in `cwd` if present,
    /// then applies environment overrides.
    pub(crate) fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let mut settings = Self::default();
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(cwd.join(CONFIG_FILE_NAME)).filter(|path| path.is_file()),
        };
        if let Some(path) = path {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Cannot read config {}", path.display()))?;
            settings
                .apply_toml(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            log::debug!("Loaded config from {}", path.display());
        }
        settings.apply_env(|name| env::var(name).ok())?;
        Ok(settings)
    }

    fn apply_toml(&mut self, text: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(text)?;
        if let Some(source) = raw.source {
            self.source = Some(source);
        }
        if let Some(kind) = raw.kind {
            self.kind = kind.parse().map_err(|err: String| anyhow!(err))?;
        }
        if let Some(size) = raw.page_size {
            self.page_size = page_size(size)?;
        }
        if let Some(mode) = raw.page_mode {
            self.page_mode = mode.parse()?;
        }
        if let Some(ordering) = raw.ordering {
            self.ordering = Some(ordering.parse()?);
        }
        if let Some(ms) = raw.debounce_ms {
            self.debounce = Duration::from_millis(ms);
        }
        if let Some(dir) = raw.prefs_dir {
            self.prefs_dir = dir;
        }
        if let Some(prefix) = raw.key_prefix {
            self.key_prefix = prefix;
        }
        if let Some(key) = raw.preference_key {
            self.preference_key = key;
        }
        if let Some(path) = raw.fallback {
            self.fallback = Some(path);
        }
        if let Some(minutes) = raw.cache_minutes {
            self.cache_ttl = Duration::from_secs(minutes.saturating_mul(60));
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            let size: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PAGE_SIZE} must be a positive integer"))?;
            self.page_size = page_size(size).with_context(|| format!("{ENV_PAGE_SIZE} is zero"))?;
        }
        if let Some(dir) = lookup(ENV_PREFS_DIR).filter(|dir| !dir.trim().is_empty()) {
            self.prefs_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_DEBOUNCE_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DEBOUNCE_MS} must be milliseconds"))?;
            self.debounce = Duration::from_millis(ms);
        }
        Ok(())
    }

    pub(crate) fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::for_kind(self.kind)
            .with_page_mode(self.page_mode)
            .with_page_size(self.page_size)
            .with_search_debounce(self.debounce)
            .with_preference_key(self.preference_key.clone());
        if let Some(ordering) = self.ordering {
            config = config.with_ordering(ordering);
        }
        config
    }
}
