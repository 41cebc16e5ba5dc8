//! Stack capture, filtering and deduplication.
//!
//! A [`StackProvider`] yields raw frames innermost-first. [`capture_stack`]
//! drops frames that belong to the toolchain, dependencies or this crate,
//! resolves each frame's source line, and returns the stack outermost-first
//! with repeated line numbers collapsed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use codectrl_protocol::BacktraceData;

use crate::hashbag::HashBag;
use crate::source::resolve_line;

/// A frame as reported by a [`StackProvider`], before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFrame {
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub name: Option<String>,
    /// Source text of the line, if the provider already knows it.
    pub code: Option<String>,
}

/// Source of the current call stack.
pub trait StackProvider {
    /// Returns the frames of the calling thread, innermost first.
    fn frames(&self) -> Vec<RawFrame>;
}

/// Walks the real call stack with the `backtrace` crate.
///
/// Inlined calls are reported as separate frames. Source text is never
/// supplied, so every frame goes through [`resolve_line`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceProvider;

impl StackProvider for BacktraceProvider {
    fn frames(&self) -> Vec<RawFrame> {
        let bt = backtrace::Backtrace::new();
        bt.frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .map(|symbol| RawFrame {
                file: symbol.filename().map(Path::to_path_buf),
                line: symbol.lineno(),
                column: symbol.colno(),
                name: symbol.name().map(|name| format!("{name:#}")),
                code: None,
            })
            .collect()
    }
}

/// Decides which frames belong to user code.
///
/// A frame is kept when its path contains none of the runtime roots and
/// does not contain the library root. Empty roots never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameFilter {
    runtime_roots: Vec<String>,
    library_root: String,
}

impl FrameFilter {
    pub fn new(runtime_roots: Vec<String>, library_root: impl Into<String>) -> Self {
        Self {
            runtime_roots,
            library_root: library_root.into(),
        }
    }

    /// Filter for the running toolchain and this crate's sources.
    ///
    /// Runtime roots are the remapped standard library prefix (`/rustc/`),
    /// the toolchain's bundled sources, and the cargo registry and git
    /// checkouts. The library root is this crate's `src/` directory with a
    /// trailing separator, so its `tests/` and `examples/` frames are kept.
    pub fn for_current_runtime() -> Self {
        let mut runtime_roots = vec!["/rustc/".to_string(), "/lib/rustlib/src/".to_string()];
        if let Some(home) = cargo_home() {
            runtime_roots.push(home.join("registry").display().to_string());
            runtime_roots.push(home.join("git").display().to_string());
        }

        let library_root = format!(
            "{}{}",
            Path::new(env!("CARGO_MANIFEST_DIR")).join("src").display(),
            std::path::MAIN_SEPARATOR
        );

        Self::new(runtime_roots, library_root)
    }

    pub fn runtime_roots(&self) -> &[String] {
        &self.runtime_roots
    }

    pub fn library_root(&self) -> &str {
        &self.library_root
    }

    /// Returns `true` if a frame from `path` should be kept.
    pub fn allows(&self, path: &str) -> bool {
        let in_runtime = self
            .runtime_roots
            .iter()
            .any(|root| !root.is_empty() && path.contains(root.as_str()));
        let in_library = !self.library_root.is_empty() && path.contains(&self.library_root);
        !in_runtime && !in_library
    }
}

fn cargo_home() -> Option<PathBuf> {
    match std::env::var_os("CARGO_HOME") {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".cargo")),
    }
}

/// Captures, filters and deduplicates the stack, outermost frame first.
///
/// Frames without a file or a positive line number are dropped. When the
/// provider has no source text for a frame, the line is read from disk; if
/// that fails the frame is kept with empty `code`.
pub fn capture_stack<P>(provider: &P, filter: &FrameFilter) -> Vec<BacktraceData>
where
    P: StackProvider + ?Sized,
{
    let mut stack = Vec::new();

    for raw in provider.frames() {
        let (Some(file), Some(line)) = (raw.file, raw.line) else {
            continue;
        };
        if line == 0 {
            continue;
        }

        let file_path = file.display().to_string();
        if !filter.allows(&file_path) {
            continue;
        }

        let code = match raw.code {
            Some(code) => code,
            None => resolve_line(&file, i64::from(line)).unwrap_or_else(|e| {
                tracing::trace!(path = %file_path, line, "source line unavailable: {e}");
                String::new()
            }),
        };

        stack.push(BacktraceData {
            line_number: line,
            column_number: raw.column.unwrap_or(0),
            file_path,
            name: raw.name.unwrap_or_default(),
            code,
        });
    }

    stack.reverse();
    dedupe(stack)
}

/// Keeps the first frame seen for each line number, preserving order.
pub fn dedupe(stack: Vec<BacktraceData>) -> Vec<BacktraceData> {
    let mut seen = HashSet::new();
    stack
        .into_iter()
        .filter(|frame| seen.insert(frame.line_number))
        .collect()
}

/// Counts how often each function name appears in `stack`.
pub fn function_occurrences(stack: &[BacktraceData]) -> HashBag<String> {
    stack.iter().map(|frame| frame.name.clone()).collect()
}
