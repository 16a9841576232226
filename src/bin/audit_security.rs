use anyhow::Result;
use auditfmt::{
    cli::{determine_exit_code, exit_codes, exit_with, CommonArgs, FailLevel},
    logging,
    output::ReportWriter,
    security::{ParseMode, SecurityFormatter},
};
use clap::Parser;
use std::io;
use std::process::ExitCode;

/// Produce a tab-separated report of vulnerable dependencies.
///
/// yarn audit --json > audit.jsonl && audit-security -f audit.jsonl > audit-security.csv
#[derive(Parser)]
#[command(name = "audit-security", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Skip malformed audit lines with a warning instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Exit with an error if vulnerabilities at or above this severity are reported
    #[arg(long, value_enum)]
    fail_on: Option<FailLevel>,
}

fn main() -> ExitCode {
    exit_with(run())
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    logging::init(cli.common.verbose);

    let mut config = cli.common.load_config()?;
    if cli.lenient {
        config.strict = false;
    }

    if cli.common.print_config {
        print!("{}", config.to_toml()?);
        return Ok(exit_codes::SUCCESS);
    }

    let mode: ParseMode = config.parse_mode();
    let source = cli.common.input.source()?;
    let reader = source.open()?;
    tracing::debug!(source = %source.describe(), ?mode, "formatting audit report");

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(config.format, stdout.lock());
    let summary = SecurityFormatter::new(mode)
        .with_ignore(config.ignore)
        .format(reader, &mut writer)?;

    tracing::info!(
        records = summary.records,
        rows = summary.rows,
        duplicates = summary.duplicates,
        ignored = summary.ignored,
        malformed = summary.malformed,
        without_advisory = summary.without_advisory,
        highest = summary.highest.map_or("none", |s| s.as_str()),
        "security report written"
    );

    Ok(determine_exit_code(summary.highest, cli.fail_on))
}
