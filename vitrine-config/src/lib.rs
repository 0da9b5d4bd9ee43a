//! Configuration library for Vitrine.
//!
//! Holds the serde models for every tunable of the catalog engine and the
//! loader that resolves them from files, inline JSON, `.env` and individual
//! environment overrides.
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{
    BASE_URL_VAR, CONFIG_JSON_VAR, CONFIG_PATH_VAR, ConfigLoad, ConfigLoader, LOG_VAR,
    PAGE_SIZE_VAR, error::ConfigLoadError,
};
pub use models::{ApiConfig, BrowseConfig, ConfigSource, LogConfig, VitrineConfig};
pub use validation::{ConfigValidationError, ConfigWarning, ConfigWarnings};
