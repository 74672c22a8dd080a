//! Application layer for Gallery.
//!
//! This crate provides the use cases that coordinate the domain layer's page
//! cache and selection store with a record source.

pub mod bulk_selector;
pub mod catalog_usecase;

#[cfg(test)]
mod test_support;

pub use bulk_selector::{BulkCompletion, BulkOutcome, BulkSelectError, BulkSelector};
pub use catalog_usecase::CatalogUseCase;
