use listview_protocol::FilterState;
use listview_records::{CollectionKind, Record};
use listview_search::{PageMode, ResultsSummary};

/// Everything a renderer needs to draw the results area.
#[derive(Debug, Clone)]
pub struct ResultsFrame<'a> {
    pub kind: CollectionKind,
    pub items: Vec<&'a Record>,
    pub summary: ResultsSummary,
    pub page_number: usize,
    pub page_count: usize,
    pub has_more: bool,
    pub mode: PageMode,
    pub filters: &'a FilterState,
    /// Set when the collection is a fallback after a failed load
    pub load_error: Option<&'a str>,
}

impl ResultsFrame<'_> {
    /// The "no results" state.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.summary.total == 0
    }

    /// Counter line, e.g. "Showing 12 of 30 opportunities".
    #[must_use]
    pub fn headline(&self) -> String {
        self.summary.describe(self.kind.nouns())
    }
}

#[derive(Debug, Clone)]
pub enum RenderFrame<'a> {
    /// The collection has not arrived yet.
    Loading,
    Results(ResultsFrame<'a>),
    /// A single record opened by id.
    Detail(&'a Record),
    /// An id was requested that the collection does not contain.
    NotFound { id: &'a str },
}

/// Presentation seam: turns frames into output. Called after every recompute.
pub trait Renderer {
    fn render(&mut self, frame: RenderFrame<'_>);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, frame: RenderFrame<'_>) {
        (**self).render(frame);
    }
}
