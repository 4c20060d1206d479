use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod query;

pub use query::parse_query;

/// Names of the user-controlled filters. Every key maps to exactly one predicate.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Search,
    Type,
    Location,
    Category,
}

impl FilterKey {
    pub const ALL: [FilterKey; 4] = [
        FilterKey::Search,
        FilterKey::Type,
        FilterKey::Location,
        FilterKey::Category,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterKey::Search => "search",
            FilterKey::Type => "type",
            FilterKey::Location => "location",
            FilterKey::Category => "category",
        }
    }

    /// Unknown names yield `None` so callers can drop them.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw))
    }

    /// Free text is debounced; every other key is a discrete selection.
    #[must_use]
    pub const fn is_free_text(self) -> bool {
        matches!(self, FilterKey::Search)
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of every filter. An empty string means "no constraint".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub location: String,
    pub category: String,
}

impl FilterState {
    #[must_use]
    pub fn get(&self, key: FilterKey) -> &str {
        match key {
            FilterKey::Search => &self.search,
            FilterKey::Type => &self.record_type,
            FilterKey::Location => &self.location,
            FilterKey::Category => &self.category,
        }
    }

    /// Stores the trimmed value; returns whether the stored value changed.
    pub fn set(&mut self, key: FilterKey, value: &str) -> bool {
        let value = value.trim();
        let slot = match key {
            FilterKey::Search => &mut self.search,
            FilterKey::Type => &mut self.record_type,
            FilterKey::Location => &mut self.location,
            FilterKey::Category => &mut self.category,
        };
        if slot.as_str() == value {
            return false;
        }
        *slot = value.to_string();
        true
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active().next().is_some()
    }

    /// Non-empty filters in key order.
    pub fn active(&self) -> impl Iterator<Item = (FilterKey, &str)> + '_ {
        FilterKey::ALL
            .into_iter()
            .map(|key| (key, self.get(key)))
            .filter(|(_, value)| !value.trim().is_empty())
    }

    /// Merges a partial update; returns whether anything changed.
    pub fn apply(&mut self, patch: &FilterPatch) -> bool {
        let mut changed = false;
        for (key, value) in patch.iter() {
            changed |= self.set(key, value);
        }
        changed
    }

    /// Lenient decoding for persisted preferences: unknown keys and non-string values are dropped.
    #[must_use]
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut state = Self::default();
        let Some(map) = value.as_object() else {
            return state;
        };
        for (raw_key, raw_value) in map {
            let Some(key) = FilterKey::parse(raw_key) else {
                continue;
            };
            if let Some(text) = raw_value.as_str() {
                state.set(key, text);
            }
        }
        state
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let map = FilterKey::ALL
            .into_iter()
            .map(|key| {
                (
                    key.as_str().to_string(),
                    serde_json::Value::String(self.get(key).to_string()),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

/// A partial [`FilterState`]: only the keys present are touched when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    entries: BTreeMap<FilterKey, String>,
}

impl FilterPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    /// Builds a patch from loosely-typed pairs, dropping unknown keys.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut patch = Self::new();
        for (key, value) in pairs {
            if let Some(key) = FilterKey::parse(key.as_ref()) {
                patch.set(key, value);
            }
        }
        patch
    }

    /// Patch that resets every filter.
    #[must_use]
    pub fn clear_all() -> Self {
        FilterKey::ALL
            .into_iter()
            .fold(Self::new(), |patch, key| patch.with(key, ""))
    }

    #[must_use]
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

/// Startup state: URL overrides replace identically-named persisted keys.
#[must_use]
pub fn restore_filter_state(
    persisted: Option<&FilterState>,
    url_overrides: &FilterPatch,
) -> FilterState {
    let mut state = persisted.cloned().unwrap_or_default();
    state.apply(url_overrides);
    state
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
