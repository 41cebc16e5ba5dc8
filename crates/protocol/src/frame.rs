//! Length-prefixed JSON framing.
//!
//! # Wire format
//!
//! ```text
//! REQUEST (Logger -> Collector):   [4 bytes BE: body_len][body_len bytes: Log JSON]
//! RESPONSE (Collector -> Logger):  [4 bytes BE: body_len][body_len bytes: RequestResult JSON]
//! ```
//!
//! Exactly one request and one response are exchanged per connection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::constants::MAX_FRAME_SIZE;

/// Errors produced while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Serializes `value` and writes it as a single frame, then flushes.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let body = serde_json::to_vec(value)?;
    if body.len() > MAX_FRAME_SIZE {
        return Err(FrameError::Protocol(format!(
            "frame too large: {} bytes (max {MAX_FRAME_SIZE})",
            body.len()
        )));
    }

    writer.write_u32(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads a single frame and deserializes its body.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<T, FrameError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let body_len = reader.read_u32().await? as usize;
    if body_len == 0 {
        return Err(FrameError::Protocol("empty frame".into()));
    }
    if body_len > MAX_FRAME_SIZE {
        return Err(FrameError::Protocol(format!(
            "frame too large: {body_len} bytes (max {MAX_FRAME_SIZE})"
        )));
    }

    let mut body = vec![0u8; body_len];
    reader.read_exact(&mut body).await?;
    Ok(serde_json::from_slice(&body)?)
}
