//! # Listview Records
//!
//! Ingestion of listing collections: opportunities, directory members, courses.
//!
//! ## Pipeline
//!
//! ```text
//! RecordSource (file / HTTP / inline)
//!     │
//!     ├──> JSON document
//!     │      ├─ bare array        → items
//!     │      └─ {"members": [..]} → items (wrapper key per kind)
//!     │
//!     ├──> Record::normalize (fixed shape, defaults, searchable text)
//!     │
//!     └──> RecordCollection (unique ids, immutable for the session)
//! ```
//!
//! A failed fetch never surfaces as an error: [`load_collection`] degrades to
//! an empty or fallback collection and reports what went wrong.
//!
//! ## Example
//!
//! ```no_run
//! use listview_records::{load_collection, CollectionKind, FileSource};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = FileSource::new("data/opportunities.json");
//!     let outcome = load_collection(&source, CollectionKind::Opportunities, None).await;
//!     println!("{} records", outcome.collection.len());
//! }
//! ```

mod collection;
mod error;
mod normalize;
mod source;
mod types;

pub use collection::RecordCollection;
pub use error::{RecordsError, Result};
pub use normalize::parse_date;
pub use source::{
    load_collection, source_for, FileSource, HttpSource, InlineSource, LoadOutcome, RecordSource,
};
pub use types::{
    fold_case, CollectionKind, Record, RecordDetails, RecordId, DEFAULT_DESCRIPTION, DEFAULT_SALARY,
    DEFAULT_TITLE,
};
