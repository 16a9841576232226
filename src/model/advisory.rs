use serde::{Deserialize, Serialize};

use super::Severity;

/// Column titles of the security report.
pub const SECURITY_HEADER: [&str; 8] = [
    "Package",
    "Version",
    "Patched versions",
    "Dependency of",
    "Vulnerability",
    "CVE",
    "Severity",
    "Info",
];

/// One line of `yarn audit --json` output.
///
/// Only `data.advisory` is of interest. Summary and progress records carry
/// no advisory and are skipped by the formatter.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditRecord {
    pub data: AuditData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditData {
    /// Left untyped so that `null` and `{}` can be told apart from a real
    /// advisory before its shape is checked.
    #[serde(default)]
    pub advisory: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Advisory {
    pub module_name: String,
    pub findings: Vec<Finding>,
    pub patched_versions: String,
    pub title: String,
    pub severity: String,
    pub cves: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Finding {
    pub version: String,
    pub paths: Vec<String>,
}

/// One row of the security report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VulnerabilityRow {
    pub package: String,
    pub version: String,
    pub patched_versions: String,
    pub dependency_of: String,
    pub vulnerability: String,
    pub cve: String,
    pub severity: String,
    pub info: String,
}

/// Identity of a reported vulnerability instance.
///
/// A structured key, so `("a", "1")` and `("a1", "")` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    package: String,
    version: String,
    vulnerability: String,
    cve: String,
}

impl VulnerabilityRow {
    pub fn key(&self) -> DedupKey {
        DedupKey {
            package: self.package.clone(),
            version: self.version.clone(),
            vulnerability: self.vulnerability.clone(),
            cve: self.cve.clone(),
        }
    }

    pub fn severity_level(&self) -> Severity {
        Severity::parse(&self.severity)
    }

    /// CVE ids carried by this row. Empty when the column reads `N/A`.
    pub fn cve_ids(&self) -> impl Iterator<Item = &str> {
        self.cve
            .split(", ")
            .filter(|id| !id.is_empty() && *id != "N/A")
    }

    pub fn to_tsv(&self) -> String {
        [
            self.package.as_str(),
            self.version.as_str(),
            self.patched_versions.as_str(),
            self.dependency_of.as_str(),
            self.vulnerability.as_str(),
            self.cve.as_str(),
            self.severity.as_str(),
            self.info.as_str(),
        ]
        .join("\t")
    }
}
