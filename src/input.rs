//! Input selection shared by both binaries.
//!
//! Both tools accept the same two flags: `-i` to read the report from
//! stdin, or `-f/--file <PATH>` to read it from disk. When both are given
//! stdin wins.

use crate::error::ReportError;
use clap::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Take input from stdin instead of a file
    #[arg(short = 'i')]
    pub stdin: bool,

    /// Path of the report file
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn source(&self) -> Result<InputSource, ReportError> {
        if self.stdin {
            return Ok(InputSource::Stdin);
        }
        match &self.file {
            Some(path) if !path.as_os_str().is_empty() => Ok(InputSource::File(path.clone())),
            _ => Err(ReportError::NoInput),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn open(&self) -> Result<Box<dyn BufRead>, ReportError> {
        match self {
            InputSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|source| ReportError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            InputSource::Stdin => "stdin".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }
}

/// Iterates the lines of a report with trailing `\n`, `\r` and `|`
/// characters removed.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the read.
pub fn report_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = Result<String, ReportError>> {
    let mut buf = Vec::new();
    std::iter::from_fn(move || {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(clean_line(&String::from_utf8_lossy(&buf)).to_string())),
            Err(e) => Some(Err(ReportError::Read(e))),
        }
    })
}

fn clean_line(line: &str) -> &str {
    line.trim_end_matches(|c| matches!(c, '\n' | '\r' | '|'))
}
