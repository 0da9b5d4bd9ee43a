//! Configuration discovery.
//!
//! Evaluation order:
//! 1) `$VITRINE_CONFIG_PATH` (TOML or JSON file),
//! 2) `$VITRINE_CONFIG_JSON` (inline JSON),
//! 3) `vitrine.toml`, `vitrine.json`, `config/vitrine.toml` or
//!    `config/vitrine.json` below the search root,
//! 4) defaults.
//!
//! Variables from a `.env` file are visible to every step but never shadow
//! the process environment. Single-value overrides (`VITRINE_API_BASE_URL`,
//! `VITRINE_PAGE_SIZE`, `VITRINE_LOG`) are applied last, then the result is
//! validated.

pub mod error;

use std::{
    collections::HashMap,
    env, fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, warn};

use crate::models::{ConfigSource, VitrineConfig};
use crate::validation::{ConfigWarnings, validate};
use error::ConfigLoadError;

pub const CONFIG_PATH_VAR: &str = "VITRINE_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "VITRINE_CONFIG_JSON";
pub const BASE_URL_VAR: &str = "VITRINE_API_BASE_URL";
pub const PAGE_SIZE_VAR: &str = "VITRINE_PAGE_SIZE";
pub const LOG_VAR: &str = "VITRINE_LOG";

const DEFAULT_FILES: &[&str] = &[
    "vitrine.toml",
    "vitrine.json",
    "config/vitrine.toml",
    "config/vitrine.json",
];

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: VitrineConfig,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
    /// `.env` file that contributed variables, if one was read.
    pub env_file: Option<PathBuf>,
    /// Override variables that were applied.
    pub overrides: Vec<&'static str>,
}

#[derive(Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    env_file: Option<PathBuf>,
    lookup: EnvLookup,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("root", &self.root)
            .field("env_file", &self.env_file)
            .finish_non_exhaustive()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader over the process environment, searching the working directory.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("."),
            env_file: Some(PathBuf::from(".env")),
            lookup: Arc::new(|name| env::var(name).ok()),
        }
    }

    /// Directory that default files and relative paths are resolved against.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// `.env` file to read; `None` disables it.
    pub fn with_env_file(mut self, path: Option<PathBuf>) -> Self {
        self.env_file = path;
        self
    }

    /// Replace the process environment, e.g. with a fixed map in tests.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Arc::new(lookup);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (dotenv, env_file) = self.read_env_file()?;
        let var = |name: &str| -> Option<String> {
            (self.lookup)(name)
                .or_else(|| dotenv.get(name).cloned())
                .filter(|value| !value.trim().is_empty())
        };

        let (mut config, source) = self.load_base(&var)?;
        let overrides = apply_overrides(&mut config, &var)?;
        let warnings = validate(&config)?;
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => warn!(hint = %hint, "{}", warning.message),
                None => warn!("{}", warning.message),
            }
        }
        debug!(source = %source, ?overrides, "configuration loaded");

        Ok(ConfigLoad {
            config,
            source,
            warnings,
            env_file,
            overrides,
        })
    }

    fn load_base(
        &self,
        var: &dyn Fn(&str) -> Option<String>,
    ) -> Result<(VitrineConfig, ConfigSource), ConfigLoadError> {
        if let Some(raw_path) = var(CONFIG_PATH_VAR) {
            let path = self.resolve(Path::new(raw_path.trim()));
            let config = load_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = var(CONFIG_JSON_VAR) {
            let config =
                VitrineConfig::parse_json(&raw).map_err(ConfigLoadError::InlineJson)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((VitrineConfig::default(), ConfigSource::Default))
    }

    fn read_env_file(
        &self,
    ) -> Result<(HashMap<String, String>, Option<PathBuf>), ConfigLoadError> {
        let Some(path) = self.env_file.as_deref().map(|p| self.resolve(p)) else {
            return Ok((HashMap::new(), None));
        };
        let iter = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter,
            Err(err) if err.not_found() => return Ok((HashMap::new(), None)),
            Err(err) => return Err(err.into()),
        };
        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        debug!(path = %path.display(), count = vars.len(), "read env file");
        Ok((vars, Some(path)))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|candidate| self.root.join(candidate))
            .find(|path| path.exists())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn load_file(path: &Path) -> Result<VitrineConfig, ConfigLoadError> {
    VitrineConfig::load_from_file(path).map_err(|source| ConfigLoadError::File {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_overrides(
    config: &mut VitrineConfig,
    var: &dyn Fn(&str) -> Option<String>,
) -> Result<Vec<&'static str>, ConfigLoadError> {
    let mut applied = Vec::new();

    if let Some(url) = var(BASE_URL_VAR) {
        config.api.base_url = url.trim().to_string();
        applied.push(BASE_URL_VAR);
    }

    if let Some(raw) = var(PAGE_SIZE_VAR) {
        let size = raw.trim().parse::<u32>().map_err(|err| {
            ConfigLoadError::InvalidOverride {
                var: PAGE_SIZE_VAR,
                value: raw.clone(),
                reason: err.to_string(),
            }
        })?;
        config.browse.page_size = size;
        applied.push(PAGE_SIZE_VAR);
    }

    if let Some(filter) = var(LOG_VAR) {
        config.log.filter = filter.trim().to_string();
        applied.push(LOG_VAR);
    }

    Ok(applied)
}
