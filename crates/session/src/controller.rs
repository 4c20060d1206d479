use crate::config::SessionConfig;
use crate::events::ViewEvent;
use crate::render::{RenderFrame, Renderer, ResultsFrame};
use listview_protocol::{restore_filter_state, FilterPatch, FilterState};
use listview_records::{LoadOutcome, RecordCollection};
use listview_search::{clamp_page, filter_indices, page};
use listview_store::PreferenceStore;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Derived view state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub loading: bool,
    pub total: usize,
    pub filtered: usize,
    pub page: usize,
    pub page_size: NonZeroUsize,
    pub has_more: bool,
}

/// Single owner of the collection, the filter set and the page number.
///
/// Every mutation goes through here: merge, persist, reset the page,
/// recompute, render. The compute steps themselves are the pure functions of
/// `listview-search`.
pub struct ViewController<R: Renderer> {
    config: SessionConfig,
    store: Arc<dyn PreferenceStore>,
    renderer: R,
    filters: FilterState,
    collection: Option<RecordCollection>,
    load_error: Option<String>,
    filtered: Vec<usize>,
    page: usize,
}

impl<R: Renderer> ViewController<R> {
    pub fn new(config: SessionConfig, store: Arc<dyn PreferenceStore>, renderer: R) -> Self {
        if !store.is_available() {
            log::info!("Preference store unavailable; filters are kept for this session only");
        }
        Self {
            config,
            store,
            renderer,
            filters: FilterState::default(),
            collection: None,
            load_error: None,
            filtered: Vec::new(),
            page: 1,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub const fn collection(&self) -> Option<&RecordCollection> {
        self.collection.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.collection.is_none()
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        let total = self.collection.as_ref().map_or(0, RecordCollection::len);
        let current = page(
            &self.filtered,
            self.page,
            self.config.page_size,
            self.config.page_mode,
        );
        ViewState {
            loading: self.is_loading(),
            total,
            filtered: self.filtered.len(),
            page: self.page,
            page_size: self.config.page_size,
            has_more: current.has_more,
        }
    }

    /// Startup merge of persisted preferences and URL overrides (URL wins).
    /// When the URL supplied anything, the merged set is persisted right away.
    pub fn restore(&mut self, url_overrides: &FilterPatch) -> &FilterState {
        let persisted = self
            .store
            .get(&self.config.preference_key)
            .map(|value| FilterState::from_json_value(&value));
        self.filters = restore_filter_state(persisted.as_ref(), url_overrides);
        self.page = 1;
        log::debug!(
            "Restored filters (persisted={}, url_overrides={}): {:?}",
            persisted.is_some(),
            url_overrides.len(),
            self.filters
        );
        if !url_overrides.is_empty() {
            self.persist();
        }
        self.recompute();
        self.render();
        &self.filters
    }

    /// Installs the one-time load result and renders page 1.
    pub fn attach(&mut self, outcome: LoadOutcome) {
        self.collection = Some(outcome.collection);
        self.load_error = outcome.error;
        self.page = 1;
        self.recompute();
        self.render();
    }

    /// Merges a partial filter update, persists it, resets to page 1 and redraws.
    pub fn on_filter_change(&mut self, patch: &FilterPatch) {
        let changed = self.filters.apply(patch);
        log::debug!("Filter change (changed={changed}): {:?}", self.filters);
        self.persist();
        self.page = 1;
        self.recompute();
        self.render();
    }

    pub fn clear_all(&mut self) {
        self.on_filter_change(&FilterPatch::clear_all());
    }

    /// Advances one page. Returns `false`, without redrawing, when loading or
    /// when everything is already shown.
    pub fn load_more(&mut self) -> bool {
        if self.is_loading() || !self.view_state().has_more {
            return false;
        }
        self.page += 1;
        self.render();
        true
    }

    /// Jumps to a page, clamped to the valid range. No-op if that is the current page.
    pub fn go_to_page(&mut self, requested: usize) -> bool {
        if self.is_loading() {
            return false;
        }
        let target = clamp_page(requested, self.filtered.len(), self.config.page_size);
        if target == self.page {
            return false;
        }
        self.page = target;
        self.render();
        true
    }

    /// Renders the detail frame for `id`. Returns whether the record exists.
    pub fn inspect(&mut self, id: &str) -> bool {
        let record = self.collection.as_ref().and_then(|c| c.find(id));
        let found = record.is_some();
        let frame = match record {
            Some(record) => RenderFrame::Detail(record),
            None if self.collection.is_none() => RenderFrame::Loading,
            None => RenderFrame::NotFound { id },
        };
        self.renderer.render(frame);
        found
    }

    /// Applies one event immediately, without debouncing.
    pub fn dispatch(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Input { key, value } => {
                self.on_filter_change(&FilterPatch::new().with(key, value));
            }
            ViewEvent::LoadMore => {
                if !self.load_more() {
                    log::debug!("Load more ignored: nothing left to show");
                }
            }
            ViewEvent::GoToPage(requested) => {
                self.go_to_page(requested);
            }
            ViewEvent::ClearAll => self.clear_all(),
            ViewEvent::Inspect { id } => {
                self.inspect(&id);
            }
            ViewEvent::Shutdown => {}
        }
    }

    fn persist(&self) {
        let saved = self
            .store
            .set(&self.config.preference_key, self.filters.to_json_value());
        if !saved && self.store.is_available() {
            log::warn!("Could not persist filters; continuing in memory");
        }
    }

    fn recompute(&mut self) {
        self.filtered = match &self.collection {
            Some(collection) => {
                filter_indices(collection.records(), &self.filters, self.config.ordering)
            }
            None => Vec::new(),
        };
    }

    fn render(&mut self) {
        let Some(collection) = &self.collection else {
            self.renderer.render(RenderFrame::Loading);
            return;
        };
        let current = page(
            &self.filtered,
            self.page,
            self.config.page_size,
            self.config.page_mode,
        );
        let records = collection.records();
        let frame = ResultsFrame {
            kind: collection.kind(),
            items: current.items.iter().map(|&idx| &records[idx]).collect(),
            summary: current.summary(),
            page_number: current.page_number,
            page_count: current.page_count,
            has_more: current.has_more,
            mode: current.mode,
            filters: &self.filters,
            load_error: self.load_error.as_deref(),
        };
        self.renderer.render(RenderFrame::Results(frame));
    }
}
