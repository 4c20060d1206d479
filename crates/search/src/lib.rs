//! # Listview Search
//!
//! The view engine behind every listing page: a pure filter step followed by
//! a pager.
//!
//! ```text
//! RecordCollection + FilterState
//!     │
//!     ├──> CompiledFilters (trim, lower-case, drop empty)
//!     │      ├─ type / category  : exact match
//!     │      ├─ location         : substring
//!     │      └─ search           : substring of searchable text
//!     │
//!     ├──> OrderingRule (newest first, or source order)
//!     │
//!     └──> page() → Page { items, has_more, .. } → ResultsSummary
//! ```
//!
//! [`filter_options`] and [`collection_stats`] summarise the whole collection
//! for selector values and headline counts.

mod error;
mod filter;
mod options;
mod ordering;
mod pager;

pub use error::{Result, SearchError};
pub use filter::{compute_filtered, filter_indices, CompiledFilters};
pub use options::{collection_stats, filter_options, CollectionStats, FilterOptions};
pub use ordering::OrderingRule;
pub use pager::{
    clamp_page, page, page_count, page_size, Page, PageMode, ResultsSummary,
    DEFAULT_PAGE_SIZE,
};
