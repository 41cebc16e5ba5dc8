use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Source lines around the reporting site, keyed by 1-based line number.
pub type CodeSnippet = BTreeMap<u32, String>;

/// A single stack frame of a captured backtrace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktraceData {
    pub line_number: u32,
    #[serde(default)]
    pub column_number: u32,
    pub file_path: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// A log record as sent to the collector.
///
/// `file_name` and `line_number` point at the last (innermost) frame of
/// `stack`. Both are empty/zero when every frame was filtered out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Assigned by the collector; empty on the client side.
    #[serde(default)]
    pub uuid: String,
    pub stack: Vec<BacktraceData>,
    pub line_number: u32,
    pub file_name: String,
    pub code_snippet: CodeSnippet,
    pub message: String,
    pub message_type: String,
    /// Peer address, filled in by the collector.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub language: String,
}

/// Outcome reported by the collector for a submitted log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "confirmed")]
    Confirmed,
    #[serde(rename = "error")]
    Error,
}

/// The collector's reply to a single submitted log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestResult {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub status: RequestStatus,
}

impl RequestResult {
    /// Creates a confirmation carrying the given message.
    pub fn confirmed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: RequestStatus::Confirmed,
        }
    }

    /// Creates an error reply carrying the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: RequestStatus::Error,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == RequestStatus::Confirmed
    }
}
