//! `yarn audit --json` reformatting.
//!
//! Each input line is one JSON record. Records carrying `data.advisory`
//! become one row of the security report; everything else is skipped.
//! Only the first finding of an advisory is consulted for the version and
//! the dependency paths.

use serde_json::Value;
use std::collections::HashSet;
use std::io::BufRead;

use crate::config::IgnoreConfig;
use crate::error::ReportError;
use crate::input::report_lines;
use crate::model::{Advisory, AuditRecord, DedupKey, Severity, VulnerabilityRow, SECURITY_HEADER};
use crate::output::ReportWriter;

/// Separator between segments of a dependency path.
const PATH_SEPARATOR: char = '>';

/// What to do with a line that is not a well-formed audit record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Abort the run.
    #[default]
    Strict,
    /// Log a warning and continue with the next line.
    Lenient,
}

/// Joins the unique root segments of `paths` with `", "`, in first-seen order.
///
/// ```
/// use auditfmt::security::root_dependencies;
///
/// let paths = vec!["a>b>c".to_string(), "a>d".to_string(), "e".to_string()];
/// assert_eq!(root_dependencies(&paths), "a, e");
/// ```
pub fn root_dependencies(paths: &[String]) -> String {
    let mut roots: Vec<&str> = Vec::new();
    for path in paths {
        let root = path.split(PATH_SEPARATOR).next().unwrap_or(path.as_str());
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots.join(", ")
}

fn cve_column(cves: &[String]) -> String {
    if cves.is_empty() {
        "N/A".to_string()
    } else {
        cves.join(", ")
    }
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` all count as "no advisory".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Builds the report row for an advisory found on line `line`.
pub fn advisory_row(advisory: Advisory, line: usize) -> Result<VulnerabilityRow, ReportError> {
    let Advisory {
        module_name,
        findings,
        patched_versions,
        title,
        severity,
        cves,
        url,
    } = advisory;

    let finding = findings
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::MissingFinding {
            line,
            package: module_name.clone(),
        })?;

    Ok(VulnerabilityRow {
        dependency_of: root_dependencies(&finding.paths),
        package: module_name,
        version: finding.version,
        patched_versions,
        vulnerability: title,
        cve: cve_column(&cves),
        severity,
        info: url,
    })
}

/// Parses one audit line. Returns `Ok(None)` for records without an advisory.
pub fn parse_line(line: usize, content: &str) -> Result<Option<VulnerabilityRow>, ReportError> {
    let record: AuditRecord = serde_json::from_str(content).map_err(|e| {
        if e.is_data() {
            ReportError::InvalidRecord { line, source: e }
        } else {
            ReportError::json(line, content, e)
        }
    })?;

    let value = match record.data.advisory {
        Some(value) if !is_blank(&value) => value,
        _ => return Ok(None),
    };

    let advisory: Advisory = serde_json::from_value(value)
        .map_err(|source| ReportError::InvalidRecord { line, source })?;
    advisory_row(advisory, line).map(Some)
}

/// Counters reported once the table has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecuritySummary {
    pub records: usize,
    pub rows: usize,
    pub duplicates: usize,
    pub without_advisory: usize,
    pub ignored: usize,
    pub malformed: usize,
    /// Most severe level among the emitted rows.
    pub highest: Option<Severity>,
}

pub struct SecurityFormatter {
    mode: ParseMode,
    ignore: IgnoreConfig,
}

impl SecurityFormatter {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            ignore: IgnoreConfig::default(),
        }
    }

    pub fn with_ignore(mut self, ignore: IgnoreConfig) -> Self {
        self.ignore = ignore;
        self
    }

    fn is_ignored(&self, row: &VulnerabilityRow) -> bool {
        self.ignore.should_ignore_package(&row.package)
            || row
                .cve_ids()
                .any(|id| self.ignore.should_ignore_vulnerability(id))
    }

    /// Streams the audit records and writes the header row followed by one
    /// row per distinct vulnerability.
    ///
    /// # Errors
    ///
    /// In [`ParseMode::Strict`] the first malformed line aborts the run. Rows
    /// written before it stay written.
    pub fn format<R: BufRead>(
        &self,
        reader: R,
        writer: &mut ReportWriter<impl std::io::Write>,
    ) -> Result<SecuritySummary, ReportError> {
        writer.header(&SECURITY_HEADER)?;

        let mut seen: HashSet<DedupKey> = HashSet::new();
        let mut summary = SecuritySummary::default();

        for (index, line) in report_lines(reader).enumerate() {
            let line_no = index + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            summary.records += 1;

            let row = match parse_line(line_no, &line) {
                Ok(Some(row)) => row,
                Ok(None) => {
                    summary.without_advisory += 1;
                    continue;
                }
                Err(e) if self.mode == ParseMode::Lenient && e.is_record_error() => {
                    tracing::warn!("skipping line {}: {}", line_no, e);
                    summary.malformed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.is_ignored(&row) {
                tracing::debug!(package = %row.package, cve = %row.cve, "ignoring advisory");
                summary.ignored += 1;
                continue;
            }

            if !seen.insert(row.key()) {
                tracing::debug!(package = %row.package, line = line_no, "duplicate advisory");
                summary.duplicates += 1;
                continue;
            }

            writer.row(&row)?;
            summary.rows += 1;
            let level = row.severity_level();
            summary.highest = Some(summary.highest.map_or(level, |h| h.max(level)));
        }

        writer.finish()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::io::Cursor;

    const FOO_RCE: &str = r#"{"data":{"advisory":{"module_name":"foo","findings":[{"version":"1.0.0","paths":["foo"]}],"patched_versions":">=2.0.0","title":"RCE","severity":"high","cves":["CVE-2020-1"],"url":"http://example.com"}}}"#;

    fn advisory_line(package: &str, paths: &[&str], cves: &[&str], severity: &str) -> String {
        serde_json::json!({
            "type": "auditAdvisory",
            "data": {
                "resolution": {"id": 1, "path": paths.first().copied().unwrap_or("")},
                "advisory": {
                    "module_name": package,
                    "findings": [{"version": "1.0.0", "paths": paths}],
                    "patched_versions": ">=1.0.1",
                    "title": "Prototype Pollution",
                    "severity": severity,
                    "cves": cves,
                    "url": "https://npmjs.com/advisories/1"
                }
            }
        })
        .to_string()
    }

    fn run(
        formatter: &SecurityFormatter,
        input: &str,
    ) -> (Vec<String>, Result<SecuritySummary, ReportError>) {
        let mut out = Vec::new();
        let mut writer = ReportWriter::new(OutputFormat::Tsv, &mut out);
        let result = formatter.format(Cursor::new(input), &mut writer);
        let text = String::from_utf8(out).unwrap();
        (text.lines().map(str::to_string).collect(), result)
    }

    #[test]
    fn test_root_dependencies() {
        let paths: Vec<String> = ["a>b>c", "a>d", "e"].iter().map(|s| s.to_string()).collect();
        assert_eq!(root_dependencies(&paths), "a, e");
        assert_eq!(root_dependencies(&[]), "");
        assert_eq!(root_dependencies(&["solo".to_string()]), "solo");
    }

    #[test]
    fn test_end_to_end() {
        let (lines, summary) = run(&SecurityFormatter::new(ParseMode::Strict), FOO_RCE);
        assert_eq!(
            lines,
            vec![
                "Package\tVersion\tPatched versions\tDependency of\tVulnerability\tCVE\tSeverity\tInfo",
                "foo\t1.0.0\t>=2.0.0\tfoo\tRCE\tCVE-2020-1\thigh\thttp://example.com",
            ]
        );
        let summary = summary.unwrap();
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.highest, Some(Severity::High));
    }

    #[test]
    fn test_missing_advisory_is_skipped() {
        let input = "{\"data\": {}}\n{\"type\":\"auditSummary\",\"data\":{\"vulnerabilities\":{}}}\n{\"data\":{\"advisory\":null}}\n";
        let (lines, summary) = run(&SecurityFormatter::new(ParseMode::Strict), input);
        assert_eq!(lines.len(), 1);
        let summary = summary.unwrap();
        assert_eq!(summary.rows, 0);
        assert_eq!(summary.without_advisory, 3);
        assert_eq!(summary.highest, None);
    }

    #[test]
    fn test_empty_advisory_object_is_skipped() {
        assert!(parse_line(1, r#"{"data":{"advisory":{}}}"#).unwrap().is_none());
    }

    #[test]
    fn test_cve_fallback() {
        let row = parse_line(1, &advisory_line("minimist", &["mkdirp>minimist"], &[], "low"))
            .unwrap()
            .unwrap();
        assert_eq!(row.cve, "N/A");
        assert_eq!(row.dependency_of, "mkdirp");
    }

    #[test]
    fn test_multiple_cves_joined() {
        let row = parse_line(1, &advisory_line("x", &["x"], &["CVE-1", "CVE-2"], "low"))
            .unwrap()
            .unwrap();
        assert_eq!(row.cve, "CVE-1, CVE-2");
    }

    #[test]
    fn test_deduplication_keeps_first_paths() {
        let input = format!(
            "{}\n{}\n",
            advisory_line("minimist", &["mkdirp>minimist"], &["CVE-2020-7598"], "low"),
            advisory_line("minimist", &["optimist>minimist"], &["CVE-2020-7598"], "low"),
        );
        let (lines, summary) = run(&SecurityFormatter::new(ParseMode::Strict), &input);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\tmkdirp\t"));
        assert!(!lines[1].contains("optimist"));
        assert_eq!(summary.unwrap().duplicates, 1);
    }

    #[test]
    fn test_only_first_finding_is_used() {
        let line = r#"{"data":{"advisory":{"module_name":"foo","findings":[{"version":"1.0.0","paths":["a>foo"]},{"version":"2.0.0","paths":["b>foo"]}],"patched_versions":">=3.0.0","title":"t","severity":"low","cves":[],"url":"u"}}}"#;
        let row = parse_line(1, line).unwrap().unwrap();
        assert_eq!(row.version, "1.0.0");
        assert_eq!(row.dependency_of, "a");
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let input = format!("\n{}\n\n", FOO_RCE);
        let (lines, summary) = run(&SecurityFormatter::new(ParseMode::Strict), &input);
        assert_eq!(lines.len(), 2);
        assert_eq!(summary.unwrap().records, 1);
    }

    #[test]
    fn test_malformed_json_is_fatal_in_strict_mode() {
        let input = format!("{}\n{{not json\n", FOO_RCE);
        let (lines, result) = run(&SecurityFormatter::new(ParseMode::Strict), &input);
        match result {
            Err(ReportError::Json { line, content, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "{not json");
            }
            other => panic!("expected JSON error, got {:?}", other),
        }
        // Rows emitted before the bad line stay on the output.
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_missing_findings_is_fatal_in_strict_mode() {
        let line = r#"{"data":{"advisory":{"module_name":"foo","findings":[],"patched_versions":"","title":"t","severity":"low","cves":[],"url":"u"}}}"#;
        let (_, result) = run(&SecurityFormatter::new(ParseMode::Strict), line);
        assert!(matches!(result, Err(ReportError::MissingFinding { line: 1, .. })));
    }

    #[test]
    fn test_missing_field_is_invalid_record() {
        let line = r#"{"data":{"advisory":{"module_name":"foo"}}}"#;
        assert!(matches!(
            parse_line(4, line),
            Err(ReportError::InvalidRecord { line: 4, .. })
        ));
        assert!(matches!(
            parse_line(5, r#"{"type":"info"}"#),
            Err(ReportError::InvalidRecord { line: 5, .. })
        ));
    }

    #[test]
    fn test_lenient_mode_skips_bad_lines() {
        let input = format!("{{not json\n{}\n{{\"data\":{{\"advisory\":{{\"module_name\":\"x\"}}}}}}\n", FOO_RCE);
        let (lines, summary) = run(&SecurityFormatter::new(ParseMode::Lenient), &input);
        assert_eq!(lines.len(), 2);
        let summary = summary.unwrap();
        assert_eq!(summary.malformed, 2);
        assert_eq!(summary.rows, 1);
    }

    #[test]
    fn test_ignore_lists() {
        let input = format!(
            "{}\n{}\n{}\n",
            advisory_line("minimist", &["mkdirp>minimist"], &["CVE-2020-7598"], "low"),
            advisory_line("lodash", &["lodash"], &["CVE-2021-23337"], "high"),
            advisory_line("@babel/core", &["@babel/core"], &[], "critical"),
        );
        let ignore = IgnoreConfig {
            packages: vec!["@babel/*".to_string()],
            vulnerabilities: vec!["CVE-2021-23337".to_string()],
        };
        let formatter = SecurityFormatter::new(ParseMode::Strict).with_ignore(ignore);
        let (lines, summary) = run(&formatter, &input);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("minimist\t"));
        let summary = summary.unwrap();
        assert_eq!(summary.ignored, 2);
        assert_eq!(summary.highest, Some(Severity::Low));
    }

    #[test]
    fn test_highest_severity() {
        let input = format!(
            "{}\n{}\n",
            advisory_line("a", &["a"], &["CVE-1"], "moderate"),
            advisory_line("b", &["b"], &["CVE-2"], "critical"),
        );
        let (_, summary) = run(&SecurityFormatter::new(ParseMode::Strict), &input);
        assert_eq!(summary.unwrap().highest, Some(Severity::Critical));
    }
}
