//! Cross-page record selection.
//!
//! The selection lives for the whole session and is keyed by record identity,
//! so it survives navigation between pages.

mod store;

pub use store::{SelectionDelta, SelectionStore};
