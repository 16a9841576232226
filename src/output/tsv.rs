use super::ReportRow;
use crate::error::ReportError;
use std::io::Write;

pub fn write_header<W: Write>(out: &mut W, columns: &[&str]) -> Result<(), ReportError> {
    writeln!(out, "{}", columns.join("\t")).map_err(ReportError::Write)
}

pub fn write_row<W: Write, T: ReportRow>(out: &mut W, row: &T) -> Result<(), ReportError> {
    writeln!(out, "{}", row.tsv()).map_err(ReportError::Write)
}
