use listview_protocol::FilterKey;

/// One user interaction, routed through a single dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A filter input changed. Search text is debounced, selections are not.
    Input { key: FilterKey, value: String },
    /// "Load more" (cumulative) or "next page" (discrete).
    LoadMore,
    /// Jump to a numbered page.
    GoToPage(usize),
    /// Reset every filter.
    ClearAll,
    /// Open the detail view of one record.
    Inspect { id: String },
    /// Stop the event loop.
    Shutdown,
}

impl ViewEvent {
    pub fn input(key: FilterKey, value: impl Into<String>) -> Self {
        ViewEvent::Input {
            key,
            value: value.into(),
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self::input(FilterKey::Search, text)
    }
}
