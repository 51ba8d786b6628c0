//! Application configuration.
//!
//! This module manages configuration with sensible defaults, loading from a
//! YAML file merged over those defaults.

use crate::client::ClientConfig;
use crate::error::{Result, TagstampError};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(test)]
mod tests;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub scan: Scan,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    ///
    /// This function is primarily used for testing.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// With `None` only the defaults are used. A given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(true));
        }

        Self::from_builder(builder, path)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            TagstampError::config_with_source("Failed to build default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                TagstampError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })
    }

    /// HTTP client settings derived from the network section.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new().with_timeout(self.network.timeout)
    }
}

/// Which registry and repository to report on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default = "default_registry_url")]
    pub url: String,

    #[serde(default = "default_repository")]
    pub repository: String,

    /// Username for the token endpoint, for private repositories.
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            repository: default_repository(),
            username: None,
            password: None,
        }
    }
}

fn default_registry_url() -> String {
    "https://gcr.io".to_string()
}

fn default_repository() -> String {
    "kubeflow-images-public/admission-webhook".to_string()
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Request timeout in seconds, 0 disables it.
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

/// Scan settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Scan {
    #[serde(default)]
    pub on_error: OnError,
}

/// What to do when a single tag cannot be processed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Stop the scan and return the error.
    #[default]
    Abort,

    /// Log the failure and continue with the next tag.
    Skip,
}
