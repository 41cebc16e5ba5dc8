//! Error types for the logger.

use codectrl_protocol::FrameError;

/// Coarse classification of a [`LoggerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Not a failure: the call was skipped by a gate.
    NoError,
    TransportError,
    LoggerError,
    IoError,
    LineNumberZero,
    LineNumberTooLarge,
    Other,
}

/// Errors produced by the logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("skipped: {0}")]
    Skipped(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line number is zero or negative: {line}")]
    LineNumberZero { line: i64 },

    #[error("line number {line} is too large for this file ({line_count} lines)")]
    LineNumberTooLarge { line: i64, line_count: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoggerError::Skipped(_) => ErrorKind::NoError,
            LoggerError::Transport(_) => ErrorKind::TransportError,
            LoggerError::Logger(_) => ErrorKind::LoggerError,
            LoggerError::Io(_) => ErrorKind::IoError,
            LoggerError::LineNumberZero { .. } => ErrorKind::LineNumberZero,
            LoggerError::LineNumberTooLarge { .. } => ErrorKind::LineNumberTooLarge,
            LoggerError::Config(_) | LoggerError::Other(_) => ErrorKind::Other,
        }
    }

    /// Returns `true` if a gate declined the call before any I/O happened.
    pub fn is_skipped(&self) -> bool {
        self.kind() == ErrorKind::NoError
    }
}

impl From<FrameError> for LoggerError {
    fn from(e: FrameError) -> Self {
        LoggerError::Transport(e.to_string())
    }
}

/// Result alias used throughout the logger.
pub type Result<T, E = LoggerError> = std::result::Result<T, E>;
