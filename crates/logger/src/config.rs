//! Logger configuration.
//!
//! Configuration can be built in code or parsed from TOML:
//!
//! ```toml
//! surround = 5
//! host = "10.0.0.2"
//! port = "3002"
//! request_timeout_secs = 10
//! ```

use std::time::Duration;

use codectrl_protocol::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SURROUND};
use serde::{Deserialize, Serialize};

use crate::error::{LoggerError, Result};

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Lines captured on each side of the reporting line (0 = default of 3).
    #[serde(default = "default_surround")]
    pub surround: u32,

    /// Collector host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Collector port.
    #[serde(default = "default_port")]
    pub port: String,

    /// Upper bound on waiting for the collector's reply. Unset means wait
    /// for as long as the connection stays open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_surround() -> u32 {
    DEFAULT_SURROUND
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

fn default_port() -> String {
    DEFAULT_PORT.into()
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            surround: default_surround(),
            host: default_host(),
            port: default_port(),
            request_timeout_secs: None,
        }
    }
}

impl LoggerConfig {
    /// Parses a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LoggerError::Config(e.to_string()))
    }

    /// Returns a copy pointing at the given collector.
    pub fn with_collector(mut self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.host = host.into();
        self.port = port.into();
        self
    }

    /// Returns a copy with the given snippet width.
    pub fn with_surround(mut self, surround: u32) -> Self {
        self.surround = surround;
        self
    }

    /// `host:port` of the collector.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Per-call options derived from this configuration.
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            surround: self.surround,
        }
    }
}

/// Options applied when assembling a single log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Lines captured on each side of the reporting line (0 = default of 3).
    pub surround: u32,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            surround: DEFAULT_SURROUND,
        }
    }
}

impl LogOptions {
    /// Surround width with the zero-means-default rule applied.
    pub fn effective_surround(&self) -> u32 {
        if self.surround == 0 {
            DEFAULT_SURROUND
        } else {
            self.surround
        }
    }
}
