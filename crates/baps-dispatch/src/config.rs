use std::path::{Path, PathBuf};

use baps_registry::RegistryConfig;
use baps_votes::{QuorumConfig, VoteError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration of the whole approval core.
///
/// ```toml
/// [quorum]
/// roster = ["BankA", "BankB", "BankC"]
///
/// [quorum.rule]
/// kind = "fraction"
/// numerator = 2
/// denominator = 3
///
/// [registry]
/// reregistration = "reject"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BapsConfig {
    #[serde(default)]
    pub quorum: QuorumConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Quorum(#[from] VoteError),
}

impl BapsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: BapsConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quorum.validate()?;
        Ok(())
    }
}
