//! Domain layer for Gallery.
//!
//! Catalog records and pages, the record source abstraction, the
//! session-lifetime selection store and the displayed-page cache.

pub mod config;
pub mod error;
pub mod record;
pub mod selection;
pub mod view;

// Re-export common types
pub use config::CatalogConfig;
pub use error::{FetchError, GalleryError, Result};
pub use record::{Page, PageRequest, Record, RecordId, RecordSource};
pub use selection::{SelectionDelta, SelectionStore};
pub use view::{PageCache, PageLoad, ViewState};
