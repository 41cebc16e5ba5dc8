//! Collector configuration.
//!
//! Reads TOML from the path given on the command line, falling back to
//! `collector.toml` in the working directory. A missing file means defaults.

use std::path::{Path, PathBuf};

use codectrl_collector::ServerConfig;
use codectrl_protocol::constants::{DEFAULT_HOST, DEFAULT_PORT};
use serde::Deserialize;

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "collector.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Capacity of the queue between the server and the printer.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

fn default_port() -> u16 {
    DEFAULT_PORT.parse().unwrap_or(3002)
}

fn default_queue_capacity() -> usize {
    256
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl CollectorConfig {
    /// Loads configuration from `path`, or defaults if the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "collector configuration loaded");
        Ok(config)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

/// Resolves the config path from the first command line argument.
pub fn config_path(mut args: impl Iterator<Item = String>) -> PathBuf {
    args.nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
