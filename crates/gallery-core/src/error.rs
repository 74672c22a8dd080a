//! Error types for the Gallery application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a [`RecordSource`](crate::record::RecordSource).
///
/// This is the only error a page fetch can produce. It is `Clone` so a
/// failed batch member can be both logged and returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchError {
    /// Network or transport failure (connection refused, timeout, TLS, ...)
    #[error("Transport error on page {page}: {message}")]
    Transport { page: usize, message: String },

    /// The source answered with a non-success status
    #[error("Source returned status {status} for page {page}")]
    Status { page: usize, status: u16 },

    /// The response could not be decoded or broke the page contract
    #[error("Malformed response for page {page}: {message}")]
    Malformed { page: usize, message: String },
}

impl FetchError {
    /// Creates a Transport error
    pub fn transport(page: usize, message: impl Into<String>) -> Self {
        Self::Transport {
            page,
            message: message.into(),
        }
    }

    /// Creates a Malformed error
    pub fn malformed(page: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            page,
            message: message.into(),
        }
    }

    /// Zero-based index of the page whose fetch failed.
    pub fn page(&self) -> usize {
        match self {
            Self::Transport { page, .. } | Self::Status { page, .. } | Self::Malformed { page, .. } => {
                *page
            }
        }
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a malformed-response error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// A shared error type for the entire Gallery application.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum GalleryError {
    /// Record source failure
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GalleryError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GalleryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for GalleryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, GalleryError>`.
pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_page() {
        assert_eq!(FetchError::transport(4, "reset").page(), 4);
        assert_eq!(FetchError::Status { page: 2, status: 503 }.page(), 2);
        assert!(FetchError::malformed(0, "bad json").is_malformed());
    }

    #[test]
    fn test_fetch_error_converts_transparently() {
        let err: GalleryError = FetchError::Status { page: 1, status: 500 }.into();
        assert!(matches!(err, GalleryError::Fetch(FetchError::Status { status: 500, .. })));
        assert_eq!(err.to_string(), "Source returned status 500 for page 1");
    }

    #[test]
    fn test_toml_error_conversion() {
        let err: GalleryError = toml::from_str::<toml::Value>("page_size = ").unwrap_err().into();
        assert!(matches!(err, GalleryError::Serialization { ref format, .. } if format == "TOML"));
    }
}
