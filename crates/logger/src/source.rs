//! Source line and snippet resolution.
//!
//! Files are read synchronously and in full. Invalid UTF-8 is replaced
//! rather than rejected so a single odd byte does not lose the snippet.

use std::path::Path;

use codectrl_protocol::CodeSnippet;

use crate::config::LogOptions;
use crate::error::{LoggerError, Result};

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_owned)
        .collect())
}

/// Returns the text of the 1-indexed `line` of the file at `path`, without
/// its line terminator.
pub fn resolve_line(path: impl AsRef<Path>, line: i64) -> Result<String> {
    let lines = read_lines(path.as_ref())?;

    if line <= 0 {
        return Err(LoggerError::LineNumberZero { line });
    }
    if line as u64 > lines.len() as u64 {
        return Err(LoggerError::LineNumberTooLarge {
            line,
            line_count: lines.len(),
        });
    }

    Ok(lines[(line - 1) as usize].clone())
}

/// Reads the lines within `surround` of `report_line` (1-indexed), clamped
/// to the file.
///
/// `surround == 0` falls back to the default width. A window past the end
/// of the file is truncated rather than rejected.
pub fn extract_snippet(
    path: impl AsRef<Path>,
    report_line: u32,
    surround: u32,
) -> Result<CodeSnippet> {
    let surround = LogOptions { surround }.effective_surround();
    let lines = read_lines(path.as_ref())?;

    let start = report_line.saturating_sub(surround).max(1);
    let end = report_line.saturating_add(surround);

    Ok((start..=end)
        .map_while(|n| lines.get(n as usize - 1).map(|text| (n, text.clone())))
        .collect())
}
