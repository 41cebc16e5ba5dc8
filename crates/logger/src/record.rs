//! Log record assembly.

use std::fmt::Display;

use codectrl_protocol::constants::LANGUAGE;
use codectrl_protocol::{CodeSnippet, Log};

use crate::config::LogOptions;
use crate::error::Result;
use crate::source::extract_snippet;
use crate::stack::{FrameFilter, StackProvider, capture_stack};

/// Builds a log record for `message` from the current stack.
///
/// The reporting site is the innermost frame left after filtering. A
/// snippet that cannot be read fails the whole record. If no frames
/// survive filtering the record is still produced, with an empty file,
/// line and snippet.
pub fn assemble<M, P>(
    message: &M,
    options: &LogOptions,
    provider: &P,
    filter: &FrameFilter,
) -> Result<Log>
where
    M: Display + ?Sized,
    P: StackProvider + ?Sized,
{
    let stack = capture_stack(provider, filter);

    let (file_name, line_number, code_snippet) = match stack.last() {
        Some(site) => {
            let snippet = extract_snippet(&site.file_path, site.line_number, options.surround)?;
            (site.file_path.clone(), site.line_number, snippet)
        }
        None => {
            tracing::debug!("no frames left after filtering");
            (String::new(), 0, CodeSnippet::new())
        }
    };

    Ok(Log {
        uuid: String::new(),
        stack,
        line_number,
        file_name,
        code_snippet,
        message: message.to_string(),
        message_type: std::any::type_name::<M>().to_string(),
        address: String::new(),
        warnings: Vec::new(),
        language: LANGUAGE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ErrorKind;
    use crate::stack::RawFrame;

    struct FixedStack(Vec<RawFrame>);

    impl StackProvider for FixedStack {
        fn frames(&self) -> Vec<RawFrame> {
            self.0.clone()
        }
    }

    const SOURCE: &str = "\
fn final_layer(logger: &Logger) {
    logger.log(\"Hello, world!\");
}

fn layer1(logger: &Logger) {
    final_layer(logger);
}

fn main() {
    let logger = Logger::new();
    layer1(&logger);
}
";

    fn source_file() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), SOURCE).unwrap();
        file
    }

    fn raw(path: &std::path::Path, line: u32, name: &str) -> RawFrame {
        RawFrame {
            file: Some(path.to_path_buf()),
            line: Some(line),
            column: None,
            name: Some(name.into()),
            code: None,
        }
    }

    #[test]
    fn assembles_record_from_innermost_frame() {
        let file = source_file();
        let provider = FixedStack(vec![
            raw(file.path(), 2, "demo::final_layer"),
            raw(file.path(), 6, "demo::layer1"),
            raw(file.path(), 11, "demo::main"),
        ]);

        let log = assemble(
            "Hello, world!",
            &LogOptions { surround: 1 },
            &provider,
            &FrameFilter::default(),
        )
        .unwrap();

        assert_eq!(log.message, "Hello, world!");
        assert_eq!(log.message_type, "str");
        assert_eq!(log.language, "Rust");
        assert!(log.uuid.is_empty());
        assert!(log.warnings.is_empty());

        assert_eq!(log.file_name, file.path().display().to_string());
        assert_eq!(log.line_number, 2);
        let names: Vec<_> = log.stack.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["demo::main", "demo::layer1", "demo::final_layer"]);
        assert_eq!(log.stack[2].code, "    logger.log(\"Hello, world!\");");

        assert_eq!(log.code_snippet.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(log.code_snippet[&2], "    logger.log(\"Hello, world!\");");
    }

    #[test]
    fn message_type_follows_static_type() {
        let provider = FixedStack(vec![]);
        let filter = FrameFilter::default();
        let options = LogOptions::default();

        let owned = String::from("text");
        let log = assemble(&owned, &options, &provider, &filter).unwrap();
        assert_eq!(log.message_type, "alloc::string::String");

        let log = assemble(&42u32, &options, &provider, &filter).unwrap();
        assert_eq!(log.message, "42");
        assert_eq!(log.message_type, "u32");
    }

    #[test]
    fn empty_stack_still_produces_record() {
        let log = assemble(
            "nobody home",
            &LogOptions::default(),
            &FixedStack(vec![]),
            &FrameFilter::default(),
        )
        .unwrap();
        assert!(log.stack.is_empty());
        assert!(log.file_name.is_empty());
        assert_eq!(log.line_number, 0);
        assert!(log.code_snippet.is_empty());
    }

    #[test]
    fn unreadable_reporting_site_fails_the_record() {
        let provider = FixedStack(vec![RawFrame {
            file: Some(PathBuf::from("/definitely/not/here.rs")),
            line: Some(4),
            column: None,
            name: Some("gone::site".into()),
            code: Some("gone();".into()),
        }]);
        let err = assemble(
            "lost",
            &LogOptions::default(),
            &provider,
            &FrameFilter::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoError);
    }
}
