//! Command-line surface shared by `audit-outdated` and `audit-security`.

use clap::{ArgAction, Args, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::error::ReportError;
use crate::input::InputArgs;
use crate::model::Severity;
use crate::output::OutputFormat;

/// Exit codes for CI integration
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const CRITICAL_VULN: u8 = 2;
    pub const HIGH_VULN: u8 = 3;
    pub const MODERATE_VULN: u8 = 4;
    pub const LOW_VULN: u8 = 5;
}

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format (tsv, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Increase log verbosity on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Loads the config file and applies the flags that override it.
    pub fn load_config(&self) -> Result<Config, ReportError> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}

/// Minimum severity that makes `--fail-on` return a non-zero exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailLevel {
    Critical,
    High,
    Moderate,
    Low,
}

impl FailLevel {
    pub fn threshold(self) -> Severity {
        match self {
            FailLevel::Critical => Severity::Critical,
            FailLevel::High => Severity::High,
            FailLevel::Moderate => Severity::Moderate,
            FailLevel::Low => Severity::Low,
        }
    }
}

/// Determine the exit code from the most severe reported row and the
/// `--fail-on` setting.
pub fn determine_exit_code(highest: Option<Severity>, fail_on: Option<FailLevel>) -> u8 {
    let (Some(fail_on), Some(highest)) = (fail_on, highest) else {
        return exit_codes::SUCCESS;
    };

    if highest < fail_on.threshold() {
        return exit_codes::SUCCESS;
    }

    match highest {
        Severity::Critical => exit_codes::CRITICAL_VULN,
        Severity::High => exit_codes::HIGH_VULN,
        Severity::Moderate => exit_codes::MODERATE_VULN,
        _ => exit_codes::LOW_VULN,
    }
}

/// Turns the outcome of a binary's `run` into its process exit code.
///
/// The missing-input usage message goes to stdout; every other error is
/// reported on stderr. A closed stdout ends the report quietly.
pub fn exit_with(result: anyhow::Result<u8>) -> ExitCode {
    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) if is_broken_pipe(&e) => ExitCode::from(exit_codes::SUCCESS),
        Err(e) => {
            if matches!(e.downcast_ref::<ReportError>(), Some(ReportError::NoInput)) {
                println!("[-] {}", e);
                println!("Run with --help for usage.");
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ReportError>()
        .is_some_and(ReportError::is_broken_pipe)
}
