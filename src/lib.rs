//! Reformat `yarn outdated` and `yarn audit --json` reports into
//! tab-separated tables.
//!
//! The crate backs two binaries:
//!
//! - `audit-outdated` - see [`outdated`]
//! - `audit-security` - see [`security`]
//!
//! ```
//! use auditfmt::output::{OutputFormat, ReportWriter};
//! use auditfmt::security::{ParseMode, SecurityFormatter};
//!
//! let input = r#"{"data":{"advisory":{"module_name":"foo","findings":[{"version":"1.0.0","paths":["foo"]}],"patched_versions":">=2.0.0","title":"RCE","severity":"high","cves":["CVE-2020-1"],"url":"http://example.com"}}}"#;
//!
//! let mut out = Vec::new();
//! let mut writer = ReportWriter::new(OutputFormat::Tsv, &mut out);
//! let summary = SecurityFormatter::new(ParseMode::Strict)
//!     .format(input.as_bytes(), &mut writer)?;
//! assert_eq!(summary.rows, 1);
//! # Ok::<(), auditfmt::ReportError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod outdated;
pub mod output;
pub mod security;

pub use config::Config;
pub use error::ReportError;
pub use model::{OutdatedEntry, Severity, VulnerabilityRow};
