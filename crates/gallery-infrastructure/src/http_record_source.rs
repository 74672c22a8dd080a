//! HttpRecordSource - REST implementation of the record source.
//!
//! Talks to an artworks API shaped like the Art Institute of Chicago public
//! API: `GET {base}/artworks?page={n}&limit={size}` where `n` is one-based.

use async_trait::async_trait;
use gallery_core::config::CatalogConfig;
use gallery_core::error::{FetchError, GalleryError, Result};
use gallery_core::record::{Page, PageRequest, RecordSource};
use reqwest::Client;
use std::time::Duration;

use crate::dto::{ARTWORK_FIELDS, ArtworkListResponse};

/// Record source backed by the artworks REST endpoint.
#[derive(Clone)]
pub struct HttpRecordSource {
    client: Client,
    base_url: String,
}

impl HttpRecordSource {
    /// Creates a source for the given base url with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GalleryError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a source from the catalog configuration.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Endpoint listing artworks.
    pub fn artworks_url(&self) -> String {
        format!("{}/artworks", self.base_url)
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_page(&self, request: PageRequest) -> std::result::Result<Page, FetchError> {
        let url = self.artworks_url();
        tracing::debug!(
            "GET {} page={} limit={}",
            url,
            request.number(),
            request.size
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("page", request.number().to_string()),
                ("limit", request.size.to_string()),
                ("fields", ARTWORK_FIELDS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::transport(request.index, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page: request.index,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(request.index, e.to_string()))?;

        let parsed: ArtworkListResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::malformed(request.index, e.to_string()))?;

        Ok(parsed.into_page(request.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artworks_url_trims_trailing_slash() {
        let source = HttpRecordSource::new("https://api.artic.edu/api/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(source.artworks_url(), "https://api.artic.edu/api/v1/artworks");
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let config = CatalogConfig::default().with_api_base_url("http://localhost:8080");
        let source = HttpRecordSource::from_config(&config).unwrap();
        assert_eq!(source.artworks_url(), "http://localhost:8080/artworks");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let source = HttpRecordSource::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

        let err = source.fetch_page(PageRequest::new(3, 12)).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.page(), 3);
    }
}
