use std::path::{Path, PathBuf};
use std::time::Duration;

use jxdiff_types::DiffOptions;
use jxdiff_worker::{DispatchConfig, DEFAULT_OFFLOAD_THRESHOLD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Contents of the `--config` TOML file.
///
/// ```toml
/// [diff]
/// array_order_matters = false
///
/// [dispatch]
/// offload_threshold_chars = 500000
/// timeout_ms = 10000
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub diff: DiffOptions,
    pub dispatch: DispatchSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSection {
    pub offload_threshold_chars: usize,
    pub timeout_ms: Option<u64>,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            offload_threshold_chars: DEFAULT_OFFLOAD_THRESHOLD,
            timeout_ms: None,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            offload_threshold_chars: self.dispatch.offload_threshold_chars,
            timeout: self.dispatch.timeout_ms.map(Duration::from_millis),
            options: self.diff.clone(),
        }
    }
}
