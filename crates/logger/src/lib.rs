//! CodeCtrl logger.
//!
//! Captures the caller's stack, the reporting source line and a snippet
//! around it, and sends the assembled [`Log`] to a CodeCtrl collector.
//!
//! ```no_run
//! # async fn demo() {
//! let logger = codectrl_logger::Logger::new();
//! match logger.log("Hello, world!").await {
//!     Ok(reply) => println!("collector replied: {reply:?}"),
//!     Err(e) => eprintln!("log not sent: {e}"),
//! }
//! # }
//! ```
//!
//! Pipeline: stack capture → filter → dedupe → source resolution → snippet
//! extraction → assembly → dispatch. Everything before dispatch runs
//! synchronously on the calling thread when a `log*` method is called.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod hashbag;
pub mod logger;
pub mod record;
pub mod source;
pub mod stack;

pub use config::{LogOptions, LoggerConfig};
pub use dispatch::send;
pub use error::{ErrorKind, LoggerError, Result};
pub use hashbag::HashBag;
pub use logger::{LogFuture, Logger};
pub use record::assemble;
pub use source::{extract_snippet, resolve_line};
pub use stack::{
    BacktraceProvider, FrameFilter, RawFrame, StackProvider, capture_stack, dedupe,
    function_occurrences,
};

pub use codectrl_protocol::{BacktraceData, CodeSnippet, Log, RequestResult, RequestStatus};
