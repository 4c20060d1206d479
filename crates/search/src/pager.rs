use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Listing pages show twelve cards at a time.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(12) {
    Some(size) => size,
    None => unreachable!(),
};

/// Pagination convention. Pick one per use case and keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// "Load more": page `n` shows the first `n * size` items.
    #[default]
    Cumulative,
    /// Numbered pages: page `n` shows items `[(n-1) * size, n * size)`.
    Discrete,
}

impl PageMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PageMode::Cumulative => "cumulative",
            PageMode::Discrete => "discrete",
        }
    }
}

impl FromStr for PageMode {
    type Err = SearchError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cumulative" | "load-more" | "load_more" => Ok(PageMode::Cumulative),
            "discrete" | "numbered" => Ok(PageMode::Discrete),
            other => Err(SearchError::UnknownPageMode(other.to_string())),
        }
    }
}

/// One page of a filtered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Page number after clamping into `1..=page_count`
    pub page_number: usize,
    pub page_count: usize,
    pub has_more: bool,
    pub total: usize,
    pub mode: PageMode,
    /// Zero-based position of `items[0]` in the filtered view
    pub offset: usize,
}

impl<T> Page<'_, T> {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub fn summary(&self) -> ResultsSummary {
        ResultsSummary {
            first: if self.items.is_empty() { 0 } else { self.offset + 1 },
            last: self.offset + self.items.len(),
            total: self.total,
            mode: self.mode,
        }
    }
}

/// Validates a configured page size.
pub fn page_size(raw: usize) -> crate::Result<NonZeroUsize> {
    NonZeroUsize::new(raw).ok_or(SearchError::ZeroPageSize)
}

/// Number of pages needed for `total` items; at least one, even when empty.
#[must_use]
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get()).max(1)
}

/// Clamps a requested page number into `1..=page_count`.
#[must_use]
pub fn clamp_page(page_number: usize, total: usize, page_size: NonZeroUsize) -> usize {
    page_number.clamp(1, page_count(total, page_size))
}

/// Slices `filtered` for display.
///
/// Out-of-range page numbers are clamped, so asking for a page past the end
/// returns the last page instead of failing. An empty view yields an empty page
/// with `has_more == false`: the "no results" state.
#[must_use]
pub fn page<T>(
    filtered: &[T],
    page_number: usize,
    page_size: NonZeroUsize,
    mode: PageMode,
) -> Page<'_, T> {
    let total = filtered.len();
    let page_count = page_count(total, page_size);
    let page_number = page_number.clamp(1, page_count);
    let end = page_number.saturating_mul(page_size.get()).min(total);
    let start = match mode {
        PageMode::Cumulative => 0,
        PageMode::Discrete => ((page_number - 1) * page_size.get()).min(end),
    };

    Page {
        items: &filtered[start..end],
        page_number,
        page_count,
        has_more: end < total,
        total,
        mode,
        offset: start,
    }
}

/// Counter line shown above the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultsSummary {
    /// One-based position of the first shown item, 0 when nothing is shown
    pub first: usize,
    /// One-based position of the last shown item
    pub last: usize,
    pub total: usize,
    pub mode: PageMode,
}

impl ResultsSummary {
    /// Renders e.g. "No opportunities found", "Showing 5 opportunities",
    /// "Showing 12 of 30 opportunities" or "Showing 25-30 of 30 opportunities".
    #[must_use]
    pub fn describe(&self, (singular, plural): (&str, &str)) -> String {
        if self.total == 0 {
            return format!("No {plural} found");
        }
        let noun = if self.total == 1 { singular } else { plural };
        if self.first <= 1 && self.last >= self.total {
            return format!("Showing {} {noun}", self.total);
        }
        match self.mode {
            PageMode::Cumulative => format!("Showing {} of {} {noun}", self.last, self.total),
            PageMode::Discrete => {
                format!("Showing {}-{} of {} {noun}", self.first, self.last, self.total)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const NOUNS: (&str, &str) = ("opportunity", "opportunities");

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn cumulative_pages_accumulate() {
        let items: Vec<usize> = (1..=30).collect();
        let first = page(&items, 1, size(12), PageMode::Cumulative);
        assert_eq!(first.items.len(), 12);
        assert!(first.has_more);
        assert_eq!(first.summary().describe(NOUNS), "Showing 12 of 30 opportunities");

        let third = page(&items, 3, size(12), PageMode::Cumulative);
        assert_eq!(third.items.len(), 30);
        assert!(!third.has_more);
        assert_eq!(third.summary().describe(NOUNS), "Showing 30 opportunities");
    }

    #[test]
    fn discrete_pages_slice() {
        let items: Vec<usize> = (1..=30).collect();
        let third = page(&items, 3, size(12), PageMode::Discrete);
        assert_eq!(third.items, &items[24..30]);
        assert_eq!(third.items.first(), Some(&25));
        assert!(!third.has_more);
        assert_eq!(third.summary().describe(NOUNS), "Showing 25-30 of 30 opportunities");

        let second = page(&items, 2, size(12), PageMode::Discrete);
        assert!(second.has_more);
        assert_eq!(second.offset, 12);
    }

    #[test]
    fn empty_view_is_the_no_results_state() {
        let items: Vec<usize> = Vec::new();
        let empty = page(&items, 4, size(12), PageMode::Cumulative);
        assert!(empty.is_empty());
        assert!(empty.items.is_empty());
        assert!(!empty.has_more);
        assert_eq!(empty.page_number, 1);
        assert_eq!(empty.summary().describe(NOUNS), "No opportunities found");
    }

    #[test]
    fn pages_past_the_end_are_clamped() {
        let items: Vec<usize> = (0..5).collect();
        let past = page(&items, 99, size(2), PageMode::Discrete);
        assert_eq!(past.page_number, 3);
        assert_eq!(past.items, &[4]);
        assert_eq!(clamp_page(0, 5, size(2)), 1);
        assert_eq!(page_count(0, size(2)), 1);
    }

    #[test]
    fn singular_noun_for_one_result() {
        let items = vec![1];
        let only = page(&items, 1, size(12), PageMode::Cumulative);
        assert_eq!(only.summary().describe(NOUNS), "Showing 1 opportunity");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(page_size(0), Err(SearchError::ZeroPageSize));
        assert_eq!(page_size(12), Ok(DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn modes_parse() {
        assert_eq!("load-more".parse::<PageMode>(), Ok(PageMode::Cumulative));
        assert_eq!("numbered".parse::<PageMode>(), Ok(PageMode::Discrete));
        assert!("infinite".parse::<PageMode>().is_err());
    }

    proptest! {
        #[test]
        fn proptest_never_exceeds_filtered(total in 0usize..200, n in 0usize..40, per in 1usize..25, discrete in any::<bool>()) {
            let items: Vec<usize> = (0..total).collect();
            let mode = if discrete { PageMode::Discrete } else { PageMode::Cumulative };
            let p = page(&items, n, size(per), mode);
            prop_assert!(p.items.len() <= total);
            let cap = match mode { PageMode::Cumulative => total, PageMode::Discrete => per };
            prop_assert!(p.items.len() <= cap);
            prop_assert_eq!(p.has_more, p.offset + p.items.len() < total);
        }

        #[test]
        fn proptest_cumulative_has_more_false_iff_all_surfaced(total in 0usize..200, n in 1usize..40, per in 1usize..25) {
            let items: Vec<usize> = (0..total).collect();
            let p = page(&items, n, size(per), PageMode::Cumulative);
            prop_assert_eq!(!p.has_more, p.items.len() == total);
        }
    }
}
