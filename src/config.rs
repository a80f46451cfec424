//! Configuration.
//!
//! Loaded from a TOML file, searched in this order:
//! 1. an explicit path (the `--config` flag)
//! 2. `$SMSPLATE_CONFIG`
//! 3. `<config dir>/smsplate/config.toml`
//! 4. built-in defaults

use crate::encoding::Repertoire;
use crate::error::{Result, TemplateError};
use crate::registry::{Variable, VariableRegistry, default_registry};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SMSPLATE_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub encoding: EncodingConfig,
    pub preview: PreviewConfig,
    /// Replaces the built-in vocabulary when present.
    pub variables: Option<Vec<Variable>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: LogLevel,
}

/// Default tracing level for the binary, overridden by `RUST_LOG` and `--debug`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub repertoire: Repertoire,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// How many sample recipients get a rendered preview.
    pub sample_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { sample_size: 3 }
    }
}

impl Config {
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|source| TemplateError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| TemplateError::io(path, source))?;
        let config = Self::from_toml(path, &contents)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn registry(&self) -> VariableRegistry {
        match &self.variables {
            Some(variables) => variables.iter().cloned().collect(),
            None => default_registry().clone(),
        }
    }
}

/// Load configuration from the first location that applies.
///
/// An explicit path or `$SMSPLATE_CONFIG` must point at a readable, valid
/// file. The per-user default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match resolve_config_path(explicit) {
        Some(path) => Config::load_from(&path),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// The file [`load_config`] reads, or `None` when it falls back to defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    env_config_path().or_else(|| default_config_path().filter(|path| path.is_file()))
}

pub fn env_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("smsplate").join("config.toml"))
}
