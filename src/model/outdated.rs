use serde::{Serialize, Serializer};

/// Column titles of the outdated report.
pub const OUTDATED_HEADER: [&str; 6] = [
    "Package",
    "Current",
    "Wanted",
    "Latest",
    "Package Type",
    "URL",
];

/// A normalized `yarn outdated` row.
///
/// The row is kept exactly as produced by the line normalizer. No column
/// count is enforced, so a malformed line yields a row with more or fewer
/// tab-separated fields than the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedEntry {
    row: String,
}

impl OutdatedEntry {
    pub fn new(row: impl Into<String>) -> Self {
        Self { row: row.into() }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.row.split('\t')
    }

    pub fn package(&self) -> Option<&str> {
        self.fields().next().filter(|name| !name.is_empty())
    }

    pub fn as_tsv(&self) -> &str {
        &self.row
    }
}

#[derive(Serialize)]
struct OutdatedRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    package: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wanted: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra: Vec<&'a str>,
}

// Fields map onto the header positionally, mirroring the TSV layout.
impl Serialize for OutdatedEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = self.fields();
        let record = OutdatedRecord {
            package: fields.next(),
            current: fields.next(),
            wanted: fields.next(),
            latest: fields.next(),
            package_type: fields.next(),
            url: fields.next(),
            extra: fields.collect(),
        };
        record.serialize(serializer)
    }
}
