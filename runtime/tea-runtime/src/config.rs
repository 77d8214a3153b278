///
/// Runtime configuration.
///
/// Read from the `[runtime]` table of a `tea.toml` next to the program:
///
/// ```toml
/// [runtime]
/// log_level = "debug"
///
/// [runtime.input]
/// decoding = "strict"
/// ```
///
/// Every field is optional. `TEA_LOG` overrides `log_level`, and
/// `TEA_CONFIG` points at a config file other than `./tea.toml`.
///

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tea_std_io::Decoding;
use thiserror::Error;

pub const CONFIG_FILE: &str = "tea.toml";
pub const CONFIG_ENV: &str = "TEA_CONFIG";
pub const LOG_ENV: &str = "TEA_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// `tracing` filter directive, e.g. `"warn"` or `"tea_std_core=trace"`.
    pub log_level: String,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub decoding: Decoding,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            input: InputConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    runtime: RuntimeConfig,
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.runtime)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded runtime config");
        Self::from_toml_str(&content)
    }

    /// Load `dir/tea.toml` if it exists, otherwise use defaults.
    pub fn discover_in(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the config for this process: `TEA_CONFIG`, then `./tea.toml`,
    /// then defaults, with `TEA_LOG` applied on top.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::discover_in(Path::new("."))?,
        };
        Ok(config.with_log_override(std::env::var(LOG_ENV).ok()))
    }

    pub fn with_log_override(mut self, log_level: Option<String>) -> Self {
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level;
        }
        self
    }
}
