//! Data types for the two reports.
//!
//! - [`OutdatedEntry`] - one normalized row of a `yarn outdated` table
//! - [`AuditRecord`] - one line of `yarn audit --json` output
//! - [`VulnerabilityRow`] - one deduplicated row of the security report
//! - [`Severity`] - advisory severity, used for `--fail-on`
//!
//! # Example
//!
//! ```
//! use auditfmt::model::{OutdatedEntry, Severity};
//!
//! let entry = OutdatedEntry::new("lodash\t4.17.15\t4.17.21\t4.17.21");
//! assert_eq!(entry.package(), Some("lodash"));
//! assert_eq!(Severity::parse("moderate"), Severity::Moderate);
//! ```

mod advisory;
mod outdated;

pub use advisory::*;
pub use outdated::*;

/// Severity levels reported by `yarn audit`, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Unknown,
    Info,
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Parses a severity string case-insensitively. Unrecognized values map
    /// to [`Severity::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "moderate" | "medium" => Severity::Moderate,
            "low" => Severity::Low,
            "info" => Severity::Info,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Moderate => "moderate",
            Severity::Low => "low",
            Severity::Info => "info",
            Severity::Unknown => "unknown",
        }
    }
}
