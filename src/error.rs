//! Error types shared by both report formatters.

use std::path::PathBuf;
use thiserror::Error;

/// Longest slice of an offending input line echoed back in a diagnostic.
const MAX_CONTENT_LEN: usize = 80;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("You must specify a path with -f/--file or pass the report via stdin using -i")]
    NoInput,

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write report: {0}")]
    Write(#[source] std::io::Error),

    #[error("Malformed JSON on line {line}: {source}\n  {content}")]
    Json {
        line: usize,
        content: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected audit record on line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Advisory for {package} on line {line} has no findings")]
    MissingFinding { line: usize, package: String },

    #[error("Invalid config file {}: {details}", path.display())]
    Config { path: PathBuf, details: String },

    #[error("Failed to render config: {0}")]
    RenderConfig(#[source] toml::ser::Error),
}

impl ReportError {
    pub(crate) fn json(line: usize, content: &str, source: serde_json::Error) -> Self {
        ReportError::Json {
            line,
            content: truncate(content, MAX_CONTENT_LEN),
            source,
        }
    }

    /// Whether the reader of stdout went away, e.g. `| head -1`.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, ReportError::Write(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }

    /// Whether lenient mode may skip the offending line and keep going.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            ReportError::Json { .. }
                | ReportError::InvalidRecord { .. }
                | ReportError::MissingFinding { .. }
        )
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
