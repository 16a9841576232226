mod json;
mod tsv;

use crate::error::ReportError;
use crate::model::{OutdatedEntry, VulnerabilityRow};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated rows under a header row
    #[default]
    Tsv,
    /// A single JSON array of row objects
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" | "csv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'tsv' or 'json'", s)),
        }
    }
}

/// A row that can be rendered in every [`OutputFormat`].
pub trait ReportRow: Serialize {
    fn tsv(&self) -> Cow<'_, str>;
}

impl ReportRow for OutdatedEntry {
    fn tsv(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_tsv())
    }
}

impl ReportRow for VulnerabilityRow {
    fn tsv(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_tsv())
    }
}

/// Writes a report incrementally.
///
/// TSV rows go straight to the underlying writer. JSON rows are collected
/// and written as one array by [`finish`](Self::finish).
pub struct ReportWriter<W: Write> {
    format: OutputFormat,
    out: W,
    rows: Vec<serde_json::Value>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out,
            rows: Vec::new(),
        }
    }

    pub fn header(&mut self, columns: &[&str]) -> Result<(), ReportError> {
        match self.format {
            OutputFormat::Tsv => tsv::write_header(&mut self.out, columns),
            OutputFormat::Json => Ok(()),
        }
    }

    pub fn row<T: ReportRow>(&mut self, row: &T) -> Result<(), ReportError> {
        match self.format {
            OutputFormat::Tsv => tsv::write_row(&mut self.out, row),
            OutputFormat::Json => {
                let value =
                    serde_json::to_value(row).map_err(|e| ReportError::Write(e.into()))?;
                self.rows.push(value);
                Ok(())
            }
        }
    }

    pub fn finish(&mut self) -> Result<(), ReportError> {
        if self.format == OutputFormat::Json {
            json::write_rows(&mut self.out, &self.rows)?;
            self.rows.clear();
        }
        self.out.flush().map_err(ReportError::Write)
    }
}
