use listview_records::CollectionKind;
use listview_search::{OrderingRule, PageMode, DEFAULT_PAGE_SIZE};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Free-text input waits at least this long for typing to settle.
pub const MIN_SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Preference key the filter set is stored under.
pub const DEFAULT_PREFERENCE_KEY: &str = "filters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub kind: CollectionKind,
    pub ordering: OrderingRule,
    pub page_mode: PageMode,
    pub page_size: NonZeroUsize,
    pub search_debounce: Duration,
    pub preference_key: String,
}

impl SessionConfig {
    /// Defaults for a collection kind: twelve per page, "load more" paging,
    /// the kind's own ordering rule.
    #[must_use]
    pub fn for_kind(kind: CollectionKind) -> Self {
        Self {
            kind,
            ordering: OrderingRule::for_kind(kind),
            page_mode: PageMode::Cumulative,
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: MIN_SEARCH_DEBOUNCE,
            preference_key: DEFAULT_PREFERENCE_KEY.to_string(),
        }
    }

    #[must_use]
    pub const fn with_page_mode(mut self, mode: PageMode) -> Self {
        self.page_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_page_size(mut self, size: NonZeroUsize) -> Self {
        self.page_size = size;
        self
    }

    #[must_use]
    pub const fn with_ordering(mut self, ordering: OrderingRule) -> Self {
        self.ordering = ordering;
        self
    }

    /// Values under [`MIN_SEARCH_DEBOUNCE`] are raised to it.
    #[must_use]
    pub fn with_search_debounce(mut self, quiet: Duration) -> Self {
        self.search_debounce = quiet.max(MIN_SEARCH_DEBOUNCE);
        self
    }

    #[must_use]
    pub fn with_preference_key(mut self, key: impl Into<String>) -> Self {
        self.preference_key = key.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_kind(CollectionKind::default())
    }
}
