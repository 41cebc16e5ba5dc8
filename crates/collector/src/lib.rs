//! Minimal collector for CodeCtrl log records.
//!
//! Listens on a TCP port and handles each connection on its own task: one
//! framed [`Log`](codectrl_protocol::Log) in, one framed
//! [`RequestResult`](codectrl_protocol::RequestResult) out. Received records
//! are stamped with a UUID and the peer address, then passed to a
//! [`LogHandler`].

mod handler;
mod server;

pub use handler::{ChannelHandler, HandlerFuture, LogHandler};
pub use server::{CollectorServer, ServerConfig};

use std::time::Duration;

/// Time allowed for a client to deliver its record once connected.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced by the collector.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame error: {0}")]
    Frame(#[from] codectrl_protocol::FrameError),

    #[error("client did not send a record in time")]
    Timeout,
}
