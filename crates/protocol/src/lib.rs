//! Wire protocol types for CodeCtrl logger-to-collector communication.
//!
//! A logger opens one TCP connection per record, writes a single framed
//! [`Log`], and reads back a single framed [`RequestResult`]. See [`frame`]
//! for the framing.

pub mod constants;
pub mod frame;
pub mod log;

// Re-export primary types for convenience.
pub use frame::{FrameError, read_frame, write_frame};
pub use log::{BacktraceData, CodeSnippet, Log, RequestResult, RequestStatus};
