use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.artic.edu/api/v1";
pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_BULK_BATCH_SIZE: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Catalog configuration loaded from `config.toml`.
///
/// Every field has a default, so an empty or missing file yields a usable
/// configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base url of the artworks API, without a trailing slash
    pub api_base_url: String,
    /// Records per page (the remote `limit` parameter)
    pub page_size: usize,
    /// Maximum number of concurrent page fetches during bulk selection
    pub bulk_batch_size: usize,
    /// Per-request timeout applied by the HTTP client
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            bulk_batch_size: DEFAULT_BULK_BATCH_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl CatalogConfig {
    /// Rejects values the core cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GalleryError::config("page_size must be at least 1"));
        }
        if self.bulk_batch_size == 0 {
            return Err(GalleryError::config("bulk_batch_size must be at least 1"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(GalleryError::config("api_base_url must not be empty"));
        }
        Ok(())
    }

    /// Sets the API base url, dropping any trailing slash.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
