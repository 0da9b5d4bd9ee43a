use thiserror::Error;
use url::Url;

use crate::models::VitrineConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{field} must be at least 1")]
    ZeroValue { field: &'static str },
    #[error("{field} must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("api.base_url '{url}' is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("api.base_url '{url}' must use http or https")]
    UnsupportedScheme { url: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Reject settings the engine cannot run with; collect the merely
/// questionable ones as warnings.
pub fn validate(
    config: &VitrineConfig,
) -> Result<ConfigWarnings, ConfigValidationError> {
    let mut warnings = ConfigWarnings::default();
    let browse = &config.browse;

    require_nonzero("browse.page_size", browse.page_size)?;
    require_nonzero("browse.max_rounds", browse.max_rounds)?;
    require_nonzero("browse.search_max_rounds", browse.search_max_rounds)?;
    if let Some(size) = browse.backend_page_size {
        require_nonzero("browse.backend_page_size", size)?;
        if size < browse.page_size {
            warnings.push_with_hint(
                format!(
                    "browse.backend_page_size ({size}) is smaller than browse.page_size ({})",
                    browse.page_size
                ),
                "every page will need at least two backend requests",
            );
        }
    }
    require_positive("browse.price_increment", browse.price_increment)?;
    require_positive(
        "browse.default_price_ceiling",
        browse.default_price_ceiling,
    )?;
    require_nonzero("api.timeout_secs", config.api.timeout_secs)?;

    let url = Url::parse(&config.api.base_url).map_err(|err| {
        ConfigValidationError::InvalidBaseUrl {
            url: config.api.base_url.clone(),
            reason: err.to_string(),
        }
    })?;
    match url.scheme() {
        "https" => {}
        "http" => {
            let local = matches!(
                url.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]")
            );
            if !local {
                warnings.push_with_hint(
                    format!("api.base_url '{url}' is not using TLS"),
                    "switch to https for any non-local storefront",
                );
            }
        }
        _ => {
            return Err(ConfigValidationError::UnsupportedScheme {
                url: config.api.base_url.clone(),
            });
        }
    }

    if browse.search_max_rounds < browse.max_rounds {
        warnings.push(
            "browse.search_max_rounds is lower than browse.max_rounds; keyword searches will scan fewer pages than plain browsing",
        );
    }

    Ok(warnings)
}

fn require_nonzero<T>(field: &'static str, value: T) -> Result<(), ConfigValidationError>
where
    T: Into<u64>,
{
    if value.into() == 0 {
        return Err(ConfigValidationError::ZeroValue { field });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigValidationError::NonPositive { field, value });
    }
    Ok(())
}
