//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Environment variables and flags both arrive through clap, which already
//! prefers a flag over its variable. Once built, the context is passed as
//! read-only throughout the application.

use libtagstamp::{Config, OnError, Result};
use std::path::Path;

/// Settings given on the command line or through `TAGSTAMP_*` variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub registry: Option<String>,
    pub repository: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
    pub keep_going: bool,
}

/// Log verbosity selected with `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    Warn,
    Info,
    Debug,
    Trace,
}

impl VerbosityLevel {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
}

impl AppContext {
    /// Build context with precedence: defaults < config file < env vars < CLI flags
    pub fn build(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        // 1 and 2. Defaults merged with the config file, if one applies
        let mut config = Config::load(config_path)?;
        if let Some(path) = config_path {
            tracing::debug!(path = %path.display(), "loaded configuration");
        }

        // 3 and 4. Environment and flags
        apply_overrides(&mut config, overrides);

        Ok(Self { config })
    }
}

fn apply_overrides(config: &mut Config, overrides: Overrides) {
    if let Some(url) = overrides.registry {
        config.registry.url = url;
    }
    if let Some(repository) = overrides.repository {
        config.registry.repository = repository;
    }
    if let Some(username) = overrides.username {
        config.registry.username = Some(username);
    }
    if let Some(password) = overrides.password {
        config.registry.password = Some(password);
    }
    if let Some(timeout) = overrides.timeout {
        config.network.timeout = timeout;
    }
    // The flag can only relax the policy; without it the file decides
    if overrides.keep_going {
        config.scan.on_error = OnError::Skip;
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
