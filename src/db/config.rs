//! Engine configuration file support.
//!
//! This module provides utilities for reading engine configuration from
//! TOML configuration files, with layered defaults so a missing file or a
//! partial file is never fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::scheduler::PartialClosureRule;

/// Engine configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Repository backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

/// Scheduling engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// How partial-closure exceptions filter generated slots. The
    /// `slot_start` value reproduces the legacy generator's start-only
    /// test.
    #[serde(default)]
    pub partial_closure_rule: PartialClosureRule,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_repo_type() -> String {
    "local".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            partial_closure_rule: PartialClosureRule::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(
                format!("cannot read config file {}: {}", path.display(), e),
                ErrorContext::new("load_config"),
            )
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(raw: &str) -> RepositoryResult<Self> {
        toml::from_str(raw).map_err(|e| {
            RepositoryError::configuration(
                format!("invalid config file: {}", e),
                ErrorContext::new("parse_config"),
            )
        })
    }

    /// Load from the path in `TAVOLA_CONFIG`, falling back to defaults when
    /// the variable is unset.
    pub fn from_env() -> RepositoryResult<Self> {
        match std::env::var("TAVOLA_CONFIG") {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }
}
