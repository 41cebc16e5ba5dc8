//! Collector TCP server.
//!
//! Binds a TCP port and accepts logger connections until shut down. Each
//! connection carries exactly one record and is handled on its own task.

use std::net::SocketAddr;
use std::sync::Arc;

use codectrl_protocol::constants::{DEFAULT_HOST, DEFAULT_PORT};
use codectrl_protocol::{FrameError, Log, RequestResult, read_frame, write_frame};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::handler::LogHandler;
use crate::{CollectorError, READ_TIMEOUT};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    /// TCP port to listen on (0 = OS-assigned).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT.parse().unwrap_or(3002),
        }
    }
}

/// The collector server.
pub struct CollectorServer<H: LogHandler> {
    config: ServerConfig,
    handler: Arc<H>,
    cancel: CancellationToken,
}

impl<H: LogHandler> CollectorServer<H> {
    pub fn new(config: ServerConfig, handler: H) -> Arc<Self> {
        Arc::new(Self {
            config,
            handler: Arc::new(handler),
            cancel: CancellationToken::new(),
        })
    }

    /// Binds the configured address.
    ///
    /// Pass the listener to [`run`](Self::run). Binding separately lets the
    /// caller read the OS-assigned port before serving.
    pub async fn bind(&self) -> Result<TcpListener, CollectorError> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!("collector listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    /// Stops the accept loop and any connection still waiting for a record.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Accepts connections until [`shutdown`](Self::shutdown) is called.
    pub async fn run(self: &Arc<Self>, listener: TcpListener) -> Result<(), CollectorError> {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("collector shutting down");
                    break Ok(());
                }

                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            let server = Arc::clone(self);
                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, peer_addr).await {
                                    warn!(%peer_addr, "connection error: {e}");
                                }
                            });
                        }
                        Err(e) => {
                            error!("accept error: {e}");
                        }
                    }
                }
            }
        }
    }

    /// Reads one record, hands it to the handler and writes the reply.
    async fn handle_connection(
        &self,
        mut stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<(), CollectorError> {
        let received = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                return Ok(());
            }
            result = tokio::time::timeout(READ_TIMEOUT, read_frame::<_, Log>(&mut stream)) => {
                result.map_err(|_| CollectorError::Timeout)?
            }
        };

        let reply = match received {
            Ok(mut log) => {
                log.uuid = uuid::Uuid::new_v4().to_string();
                log.address = peer_addr.to_string();
                debug!(
                    %peer_addr,
                    uuid = %log.uuid,
                    file = %log.file_name,
                    line = log.line_number,
                    "log received"
                );
                self.handler.on_log(log).await
            }
            Err(FrameError::Io(e)) => return Err(e.into()),
            Err(e) => {
                warn!(%peer_addr, "rejecting malformed record: {e}");
                RequestResult::error(e.to_string())
            }
        };

        write_frame(&mut stream, &reply).await?;
        stream.shutdown().await?;
        Ok(())
    }
}
