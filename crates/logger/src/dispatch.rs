//! One-shot delivery of a log record to the collector.
//!
//! Each call opens its own TCP connection, so concurrent sends never share
//! a channel. The exchange runs on a spawned task that always shuts the
//! connection down before reporting its single outcome.

use std::time::Duration;

use codectrl_protocol::{FrameError, Log, RequestResult, read_frame, write_frame};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::error::{LoggerError, Result};

/// Sends `log` to `host:port` and waits for the collector's reply.
///
/// With `timeout == None` the wait is unbounded. A reply with an error
/// status is returned as [`LoggerError::Transport`].
pub async fn send(
    log: Log,
    host: &str,
    port: &str,
    timeout: Option<Duration>,
) -> Result<RequestResult> {
    let addr = format!("{host}:{port}");
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|e| LoggerError::Transport(format!("failed to connect to {addr}: {e}")))?;
    debug!(%addr, "connected to collector");

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(exchange(stream, &log, timeout).await);
    });

    let reply = rx
        .await
        .map_err(|_| LoggerError::Transport("send task ended without a reply".into()))?
        .map_err(|e| match e {
            ExchangeError::TimedOut(limit) => {
                LoggerError::Transport(format!("no reply from {addr} within {limit:?}"))
            }
            ExchangeError::Frame(e) => e.into(),
        })?;

    if !reply.is_confirmed() {
        return Err(LoggerError::Transport(format!(
            "collector rejected log: {}",
            reply.message
        )));
    }

    debug!(%addr, "log delivered");
    Ok(reply)
}

enum ExchangeError {
    TimedOut(Duration),
    Frame(FrameError),
}

/// Writes the record and reads the reply within `timeout`, then shuts the
/// connection down whatever the outcome.
async fn exchange(
    mut stream: TcpStream,
    log: &Log,
    timeout: Option<Duration>,
) -> Result<RequestResult, ExchangeError> {
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, write_then_read(&mut stream, log))
            .await
            .unwrap_or_else(|_| Err(ExchangeError::TimedOut(limit))),
        None => write_then_read(&mut stream, log).await,
    };

    if let Err(e) = stream.shutdown().await {
        trace!("connection shutdown failed: {e}");
    }

    result
}

async fn write_then_read(
    stream: &mut TcpStream,
    log: &Log,
) -> Result<RequestResult, ExchangeError> {
    write_frame(stream, log).await.map_err(ExchangeError::Frame)?;
    read_frame(stream).await.map_err(ExchangeError::Frame)
}

#[cfg(test)]
mod tests {
    use codectrl_protocol::constants::LANGUAGE;
    use tokio::net::TcpListener;

    use super::*;
    use crate::error::ErrorKind;

    fn log(message: &str) -> Log {
        Log {
            uuid: String::new(),
            stack: vec![],
            line_number: 0,
            file_name: String::new(),
            code_snippet: Default::default(),
            message: message.into(),
            message_type: "str".into(),
            address: String::new(),
            warnings: vec![],
            language: LANGUAGE.into(),
        }
    }

    /// Accepts one connection, reads a log and answers with `reply`.
    async fn one_shot_collector(reply: RequestResult) -> (String, tokio::task::JoinHandle<Log>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port().to_string();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let received: Log = read_frame(&mut stream).await.unwrap();
            write_frame(&mut stream, &reply).await.unwrap();
            received
        });
        (port, handle)
    }

    #[tokio::test]
    async fn send_delivers_and_returns_reply() {
        let (port, collector) = one_shot_collector(RequestResult::confirmed("stored")).await;

        let reply = send(log("hello"), "127.0.0.1", &port, None).await.unwrap();
        assert_eq!(reply.message, "stored");

        let received = collector.await.unwrap();
        assert_eq!(received.message, "hello");
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port().to_string()
        };
        let err = send(log("hello"), "127.0.0.1", &port, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
    }

    #[tokio::test]
    async fn rejected_reply_is_transport_error() {
        let (port, _collector) = one_shot_collector(RequestResult::error("bad record")).await;
        let err = send(log("hello"), "127.0.0.1", &port, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert!(err.to_string().contains("bad record"));
    }

    #[tokio::test]
    async fn closed_without_reply_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port().to_string();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _: Log = read_frame(&mut stream).await.unwrap();
            // Drop without answering.
        });

        let err = send(log("hello"), "127.0.0.1", &port, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
    }

    #[tokio::test]
    async fn timeout_bounds_the_wait() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port().to_string();
        let silent = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            // Hold the connection open without replying.
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let err = send(
            log("hello"),
            "127.0.0.1",
            &port,
            Some(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert!(err.to_string().contains("no reply"));
        silent.abort();
    }

    #[tokio::test]
    async fn timed_out_send_closes_the_connection() {
        use tokio::io::AsyncReadExt;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port().to_string();
        let silent = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _: Log = read_frame(&mut stream).await.unwrap();
            let mut buf = [0u8; 1];
            tokio::time::timeout(Duration::from_secs(2), stream.read(&mut buf)).await
        });

        let err = send(
            log("hello"),
            "127.0.0.1",
            &port,
            Some(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);

        let read = silent
            .await
            .unwrap()
            .expect("connection left open after timeout");
        assert_eq!(read.unwrap(), 0);
    }
}
