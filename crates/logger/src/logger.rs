//! The public logging entry points.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;

use codectrl_protocol::constants::DEBUG_ENV_VAR;
use codectrl_protocol::{Log, RequestResult};

use crate::config::LoggerConfig;
use crate::dispatch::send;
use crate::error::{LoggerError, Result};
use crate::record::assemble;
use crate::stack::{BacktraceProvider, FrameFilter, StackProvider};

/// Future returned by the `log*` methods.
///
/// The record is assembled when the method is called; awaiting the future
/// only performs the network exchange.
pub type LogFuture = Pin<Box<dyn Future<Output = Result<RequestResult>> + Send + 'static>>;

/// Captures log records at the call site and sends them to a collector.
#[derive(Debug, Clone)]
pub struct Logger {
    config: LoggerConfig,
    filter: FrameFilter,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Creates a logger for the default collector (`127.0.0.1:3002`).
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        Self {
            config,
            filter: FrameFilter::for_current_runtime(),
        }
    }

    /// Replaces the frame filter used during capture.
    pub fn with_filter(mut self, filter: FrameFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Assembles a record for `message` from the current stack without
    /// sending it.
    pub fn record<M: Display + ?Sized>(&self, message: &M) -> Result<Log> {
        self.record_with(message, &BacktraceProvider)
    }

    /// Like [`record`](Self::record), with frames from `provider`.
    pub fn record_with<M, P>(&self, message: &M, provider: &P) -> Result<Log>
    where
        M: Display + ?Sized,
        P: StackProvider + ?Sized,
    {
        assemble(message, &self.config.log_options(), provider, &self.filter)
    }

    /// Captures the call site and sends the record.
    pub fn log<M: Display + ?Sized>(&self, message: &M) -> LogFuture {
        let record = self.record(message);
        self.dispatch(record)
    }

    /// Sends only if `condition` returns `true`.
    ///
    /// Otherwise resolves to [`LoggerError::Skipped`] without touching the
    /// stack or the network.
    pub fn log_if<M, F>(&self, message: &M, condition: F) -> LogFuture
    where
        M: Display + ?Sized,
        F: FnOnce() -> bool,
    {
        let record = if condition() {
            self.record(message)
        } else {
            Err(LoggerError::Skipped("condition was not true".into()))
        };
        self.dispatch(record)
    }

    /// Sends only if the `CODECTRL_DEBUG` environment variable is set.
    pub fn log_when_env<M: Display + ?Sized>(&self, message: &M) -> LogFuture {
        self.log_when_env_var(message, DEBUG_ENV_VAR)
    }

    /// Sends only if the environment variable `name` is set, to any value.
    pub fn log_when_env_var<M: Display + ?Sized>(&self, message: &M, name: &str) -> LogFuture {
        let record = if std::env::var_os(name).is_some() {
            self.record(message)
        } else {
            Err(LoggerError::Skipped(format!(
                "environment variable {name} was not set"
            )))
        };
        self.dispatch(record)
    }

    fn dispatch(&self, record: Result<Log>) -> LogFuture {
        let host = self.config.host.clone();
        let port = self.config.port.clone();
        let timeout = self.config.request_timeout();

        Box::pin(async move {
            let log = record?;
            send(log, &host, &port, timeout).await
        })
    }
}
