//! Record source trait.
//!
//! Defines the interface for querying a remote paginated catalog.

use super::model::{Page, PageRequest};
use crate::error::FetchError;
use async_trait::async_trait;

/// An abstract paginated record source.
///
/// This trait decouples selection and navigation logic from the transport
/// that actually serves the catalog (HTTP API, fixture data, ...).
///
/// # Implementation Notes
///
/// Implementations must be idempotent per `(index, size)` pair: the same
/// request has to yield the same records in the same order. Bulk selection
/// relies on this to produce "the first N records" deterministically.
/// Implementations do not retry; a failure is terminal for that request.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches one page of records.
    ///
    /// # Arguments
    ///
    /// * `request` - Zero-based page index and page size
    ///
    /// # Returns
    ///
    /// - `Ok(Page)`: The records of that page plus the collection total
    /// - `Err(FetchError)`: Transport, status or decoding failure
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, FetchError>;
}
