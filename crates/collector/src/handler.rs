//! Handler trait for received log records.

use std::future::Future;
use std::pin::Pin;

use codectrl_protocol::{Log, RequestResult};
use tokio::sync::mpsc;

/// A boxed future returned by handler methods.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = RequestResult> + Send + 'a>>;

/// Receives every log record accepted by the server.
///
/// The returned [`RequestResult`] is sent back to the logger as-is.
pub trait LogHandler: Send + Sync + 'static {
    fn on_log(&self, log: Log) -> HandlerFuture<'_>;
}

/// Forwards records into an `mpsc` channel and confirms them with their
/// assigned UUID.
pub struct ChannelHandler {
    tx: mpsc::Sender<Log>,
}

impl ChannelHandler {
    /// Creates a handler and the receiving end of its channel.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Log>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl LogHandler for ChannelHandler {
    fn on_log(&self, log: Log) -> HandlerFuture<'_> {
        Box::pin(async move {
            let uuid = log.uuid.clone();
            match self.tx.send(log).await {
                Ok(()) => RequestResult::confirmed(uuid),
                Err(_) => RequestResult::error("collector is shutting down"),
            }
        })
    }
}
