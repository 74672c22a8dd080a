//! Adapters for the Gallery core: HTTP record source, config file and paths.

pub mod config_service;
pub mod dto;
pub mod http_record_source;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::http_record_source::HttpRecordSource;
pub use crate::paths::GalleryPaths;
