//! Catalog record domain module.
//!
//! This module contains the catalog entry model, the page model returned by a
//! single source query, and the record source trait that remote catalogs
//! implement.
//!
//! # Module Structure
//!
//! - `model`: `RecordId`, `Record`, `Page`, `PageRequest`
//! - `source`: `RecordSource` trait for paginated queries
//!
//! # Usage
//!
//! ```ignore
//! use gallery_core::record::{Page, PageRequest, Record, RecordId};
//! use gallery_core::record::RecordSource;
//! ```

mod model;
pub mod source;

// Re-export public API
pub use model::{Page, PageRequest, Record, RecordId, page_count};

pub use source::RecordSource;
