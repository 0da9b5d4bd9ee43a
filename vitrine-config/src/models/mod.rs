use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use vitrine_core::query::{BackfillConfig, CeilingPolicy, DEFAULT_PAGE_SIZE};
use vitrine_model::price::{DEFAULT_PRICE_CEILING, PRICE_DISPLAY_INCREMENT};

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => f.write_str("built-in defaults"),
            ConfigSource::EnvPath(path) => {
                write!(f, "$VITRINE_CONFIG_PATH ({})", path.display())
            }
            ConfigSource::EnvInline => f.write_str("$VITRINE_CONFIG_JSON"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Top-level settings shared by the CLI and embedding applications.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VitrineConfig {
    pub api: ApiConfig,
    pub browse: BrowseConfig,
    pub log: LogConfig,
}

/// Where the storefront API lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and optional path prefix; endpoints are resolved below it.
    pub base_url: String,
    /// Per-request timeout in seconds. The engine itself never times out.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pagination and price slider tuning. Raising the round bounds makes sparse
/// catalogs (many hidden rows, narrow keywords) fill pages more often at the
/// cost of extra requests per page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowseConfig {
    pub page_size: u32,
    /// Rows per backend request; unset uses `page_size`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_page_size: Option<u32>,
    pub max_rounds: u32,
    pub search_max_rounds: u32,
    /// Step the derived price ceiling is rounded up to.
    pub price_increment: f64,
    /// Slider maximum before any product has been seen.
    pub default_price_ceiling: f64,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        let backfill = BackfillConfig::default();
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            backend_page_size: backfill.backend_page_size,
            max_rounds: backfill.max_rounds,
            search_max_rounds: backfill.search_max_rounds,
            price_increment: PRICE_DISPLAY_INCREMENT,
            default_price_ceiling: DEFAULT_PRICE_CEILING,
        }
    }
}

impl BrowseConfig {
    pub fn backfill(&self) -> BackfillConfig {
        BackfillConfig {
            max_rounds: self.max_rounds,
            search_max_rounds: self.search_max_rounds,
            backend_page_size: self.backend_page_size,
        }
    }

    pub fn ceiling_policy(&self) -> CeilingPolicy {
        CeilingPolicy {
            increment: self.price_increment,
            fallback: self.default_price_ceiling,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl VitrineConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read vitrine config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid vitrine config {}", path.display())
            }),
            Some("toml") | Some("tml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid vitrine config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse vitrine config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid vitrine config json: {err}"))
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("failed to render config as toml")
    }
}
