use crate::error::ReportError;
use std::io::Write;

pub fn write_rows<W: Write>(out: &mut W, rows: &[serde_json::Value]) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *out, rows).map_err(|e| ReportError::Write(e.into()))?;
    writeln!(out).map_err(ReportError::Write)
}
