//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the catalog configuration
//! from the configuration file (~/.config/gallery/config.toml).

use crate::paths::GalleryPaths;
use gallery_core::config::CatalogConfig;
use gallery_core::error::{GalleryError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "GALLERY_API_URL";

/// Configuration service that loads and caches the catalog configuration.
///
/// Priority: environment variables > config.toml > built-in defaults.
/// A missing file is not an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<CatalogConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading the platform default config file.
    pub fn new_default() -> Result<Self> {
        let path = GalleryPaths::config_file().map_err(|e| GalleryError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a ConfigService reading the given file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it from file if not cached.
    pub fn get_config(&self) -> Result<CatalogConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| GalleryError::internal("config cache lock poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = apply_env_overrides(Self::load_file(&self.path)?, |key| std::env::var(key).ok());
        loaded.validate()?;

        {
            let mut write_lock = self
                .config
                .write()
                .map_err(|_| GalleryError::internal("config cache lock poisoned"))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_file(path: &Path) -> Result<CatalogConfig> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(CatalogConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: CatalogConfig = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Applies environment overrides on top of a file-loaded configuration.
pub fn apply_env_overrides<F>(config: CatalogConfig, lookup: F) -> CatalogConfig
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(API_URL_ENV) {
        Some(url) if !url.trim().is_empty() => config.with_api_base_url(url),
        _ => config,
    }
}
