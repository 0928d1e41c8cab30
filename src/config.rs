//! Output configuration types.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "specmangle.toml";

/// How encoded symbols are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One symbol per line
    #[default]
    Human,
    /// JSON array of `{kind, base, symbol}` records
    Json,
}

/// What is printed for each event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmitMode {
    /// Full `_TTS...` symbol including the base name
    #[default]
    Symbol,
    /// Specialization suffix only
    Suffix,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub emit: EmitMode,
}

/// Configuration read from `specmangle.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangleConfig {
    #[serde(default)]
    pub output: OutputConfig,
}

impl MangleConfig {
    /// Load `specmangle.toml` from a directory, falling back to defaults when
    /// the file does not exist.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }
}
