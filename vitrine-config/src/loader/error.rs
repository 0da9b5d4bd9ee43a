use super::super::validation::ConfigValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to load config file {path}")]
    File {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to parse VITRINE_CONFIG_JSON: {0}")]
    InlineJson(#[source] anyhow::Error),
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidOverride {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Validation(#[from] ConfigValidationError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
