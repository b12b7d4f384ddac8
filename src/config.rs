//! Database configuration
//!
//! Every field has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! namespace: family
//! data_path: ./pipegraph_data
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Key prefix for persisted graphs
    pub namespace: String,
    /// Name used when persisting without an explicit name
    pub default_graph: String,
    /// RocksDB directory (None = in-memory only)
    pub data_path: Option<PathBuf>,
    /// Priority of alias rewrites in the transformer chain
    pub alias_priority: i32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            namespace: "db".to_string(),
            default_graph: "graph".to_string(),
            data_path: None,
            alias_priority: 100,
        }
    }
}

impl DbConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
