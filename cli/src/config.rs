//! CLI configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use upvote_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for the `upvote` binary.
///
/// Loaded from a TOML file via [`CliConfig::from_toml_file`]; command-line
/// flags and `UPVOTE_*` environment variables override individual fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding the LMDB data file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum size of the data file in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Maximum number of tables in the environment.
    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive, e.g. `"info"` or `"warn,upvote_manager=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./upvote_data")
}

fn default_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_max_dbs() -> u32 {
    8
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl CliConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            max_dbs: default_max_dbs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
