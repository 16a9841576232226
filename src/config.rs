//! Configuration file handling.
//!
//! Both formatters read an optional TOML file that sets their defaults.
//! Command-line flags always take precedence over it.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/auditfmt/config.toml`
//! - macOS: `~/Library/Application Support/auditfmt/config.toml`
//! - Windows: `%APPDATA%\auditfmt\config.toml`
//!
//! A different file can be given with `--config <PATH>`.
//!
//! # Example Configuration
//!
//! ```toml
//! format = "tsv"
//! strict = true
//! header_detection = "positional"
//!
//! [ignore]
//! packages = ["@types/*"]
//! vulnerabilities = ["CVE-2021-12345"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::outdated::HeaderDetection;
use crate::output::OutputFormat;
use crate::security::ParseMode;

/// Application configuration.
///
/// ```
/// use auditfmt::Config;
///
/// let config = Config::default();
/// assert!(config.strict);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report format written to stdout.
    ///
    /// Valid values: "tsv", "json"
    /// Default: "tsv"
    pub format: OutputFormat,

    /// Abort the security report on the first malformed audit line.
    ///
    /// When false, bad lines are skipped with a warning.
    /// Default: true
    pub strict: bool,

    /// How the outdated report locates its table.
    ///
    /// Valid values: "positional", "content"
    /// Default: "positional"
    pub header_detection: HeaderDetection,

    /// Ignore list configuration for suppressing known issues.
    pub ignore: IgnoreConfig,
}

/// Packages and vulnerabilities left out of the reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names to drop from both reports.
    ///
    /// Supports glob patterns (e.g., "lodash*", "@types/*").
    pub packages: Vec<String>,

    /// CVE ids to drop from the security report.
    pub vulnerabilities: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored.
    pub fn should_ignore_package(&self, name: &str) -> bool {
        self.packages.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }

    /// Check if a vulnerability should be ignored.
    pub fn should_ignore_vulnerability(&self, cve: &str) -> bool {
        self.vulnerabilities.iter().any(|id| id.eq_ignore_ascii_case(cve))
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    let first = parts[0];
    if !first.is_empty() {
        match remaining.strip_prefix(first) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    let last = parts[parts.len() - 1];
    if !last.is_empty() {
        match remaining.strip_suffix(last) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Tsv,
            strict: true,
            header_detection: HeaderDetection::Positional,
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried and defaults are used when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ReportError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::Config {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ReportError::Config {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Returns the path to the configuration file.
    ///
    /// ```
    /// use auditfmt::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("auditfmt/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("auditfmt")
            .join("config.toml")
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Renders this configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ReportError> {
        toml::to_string_pretty(self).map_err(ReportError::RenderConfig)
    }
}
