//! `yarn outdated` table reformatting.
//!
//! `yarn outdated` prints a banner, a colour legend and a column-title line
//! before the table, and a `Done in ...` line after it:
//!
//! ```text
//! yarn outdated v1.22.19
//! info Color legend :
//!  "<red>"    : Major Update backward-incompatible updates
//!  "<yellow>" : Minor Update backward-compatible features
//!  "<green>"  : Patch Update backwards-compatible bug fixes
//! Package Current Wanted Latest Package Type URL
//! lodash  4.17.15 4.17.21 4.17.21 dependencies https://lodash.com/
//! Done in 0.84s.
//! ```
//!
//! Every table line is normalized with [`format_outdated_line`] and written
//! under a fixed header row. Malformed lines are never rejected.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::LazyLock;

use crate::config::IgnoreConfig;
use crate::error::ReportError;
use crate::input::report_lines;
use crate::model::{OutdatedEntry, OUTDATED_HEADER};
use crate::output::ReportWriter;

/// Lines preceding the table in `yarn outdated` output.
pub const HEADER_LINES: usize = 6;

/// Lines following the table in `yarn outdated` output.
pub const TRAILER_LINES: usize = 1;

static GROUP_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)dependencies").expect("valid label pattern"));

static COLUMN_TITLES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Package\s+Current\s+Wanted\s+Latest\b").expect("valid title pattern")
});

static DONE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Done in\b").expect("valid trailer pattern"));

/// How the table is located inside the command output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderDetection {
    /// Drop the first [`HEADER_LINES`] and last [`TRAILER_LINES`] lines.
    #[default]
    Positional,
    /// Start after the column-title line and skip `Done in` and blank lines.
    Content,
}

/// Normalizes one table line.
///
/// Every case-insensitive occurrence of `dependencies` is removed, then each
/// run of whitespace becomes a single tab. Leading and trailing whitespace
/// produce no empty fields.
///
/// ```
/// use auditfmt::outdated::format_outdated_line;
///
/// assert_eq!(
///     format_outdated_line("  lodash    4.17.15  4.17.21  4.17.21  "),
///     "lodash\t4.17.15\t4.17.21\t4.17.21"
/// );
/// ```
pub fn format_outdated_line(line: &str) -> String {
    let stripped = GROUP_LABEL.replace_all(line, "");
    stripped.split_whitespace().collect::<Vec<_>>().join("\t")
}

/// Counters reported once the table has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutdatedSummary {
    pub rows: usize,
    pub ignored: usize,
}

pub struct OutdatedFormatter {
    detection: HeaderDetection,
    ignore: IgnoreConfig,
}

impl OutdatedFormatter {
    pub fn new(detection: HeaderDetection) -> Self {
        Self {
            detection,
            ignore: IgnoreConfig::default(),
        }
    }

    pub fn with_ignore(mut self, ignore: IgnoreConfig) -> Self {
        self.ignore = ignore;
        self
    }

    /// Reads the whole report and writes the header row followed by one row
    /// per table line, in input order.
    pub fn format<R: BufRead>(
        &self,
        reader: R,
        writer: &mut ReportWriter<impl std::io::Write>,
    ) -> Result<OutdatedSummary, ReportError> {
        writer.header(&OUTDATED_HEADER)?;

        let mut summary = OutdatedSummary::default();
        let mut emit = |line: &str| -> Result<(), ReportError> {
            let entry = OutdatedEntry::new(format_outdated_line(line));
            if let Some(name) = entry.package() {
                if self.ignore.should_ignore_package(name) {
                    tracing::debug!(package = name, "ignoring outdated package");
                    summary.ignored += 1;
                    return Ok(());
                }
            }
            writer.row(&entry)?;
            summary.rows += 1;
            Ok(())
        };

        match self.detection {
            HeaderDetection::Positional => {
                let mut pending: Option<String> = None;
                for line in report_lines(reader).skip(HEADER_LINES) {
                    if let Some(previous) = pending.replace(line?) {
                        emit(&previous)?;
                    }
                }
                if let Some(trailer) = pending {
                    tracing::trace!(line = %trailer, "dropping trailer line");
                }
            }
            HeaderDetection::Content => {
                let mut in_table = false;
                for line in report_lines(reader) {
                    let line = line?;
                    if !in_table {
                        in_table = COLUMN_TITLES.is_match(&line);
                        continue;
                    }
                    if line.trim().is_empty() || DONE_LINE.is_match(&line) {
                        continue;
                    }
                    emit(&line)?;
                }
                if !in_table {
                    tracing::warn!("no column-title line found in outdated report");
                }
            }
        }

        writer.finish()?;
        Ok(summary)
    }
}
