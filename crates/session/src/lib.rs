//! Listview session - the stateful shell around the pure filter/page core
//!
//! One controller owns the loaded collection, the active filters and the
//! current page. Every interaction flows through it:
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌───────────┐   ┌──────────┐   ┌──────────┐
//! │ ViewEvent│ → │  debounce  │ → │ merge +   │ → │ filter + │ → │ Renderer │
//! │ (input)  │   │ (search)   │   │ persist   │   │ page     │   │  frame   │
//! └──────────┘   └────────────┘   └───────────┘   └──────────┘   └──────────┘
//! ```
//!
//! The collection arrives once, asynchronously. Until then the renderer gets
//! [`RenderFrame::Loading`]; a failed load degrades to an empty collection.

mod config;
mod controller;
mod debounce;
mod events;
mod render;
mod session;

pub use config::{SessionConfig, DEFAULT_PREFERENCE_KEY, MIN_SEARCH_DEBOUNCE};
pub use controller::{ViewController, ViewState};
pub use events::ViewEvent;
pub use render::{RenderFrame, Renderer, ResultsFrame};
pub use session::run_session;
