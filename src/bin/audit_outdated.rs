use anyhow::Result;
use auditfmt::{
    cli::{exit_codes, exit_with, CommonArgs},
    logging,
    outdated::{HeaderDetection, OutdatedFormatter},
    output::ReportWriter,
};
use clap::Parser;
use std::io;
use std::process::ExitCode;

/// Produce a tab-separated report of outdated dependencies.
///
/// yarn outdated | audit-outdated -i > audit-outdated.csv
#[derive(Parser)]
#[command(name = "audit-outdated", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Locate the table by its column titles instead of fixed line offsets
    #[arg(long)]
    detect_header: bool,
}

fn main() -> ExitCode {
    exit_with(run())
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    logging::init(cli.common.verbose);

    let mut config = cli.common.load_config()?;
    if cli.detect_header {
        config.header_detection = HeaderDetection::Content;
    }

    if cli.common.print_config {
        print!("{}", config.to_toml()?);
        return Ok(exit_codes::SUCCESS);
    }

    let source = cli.common.input.source()?;
    let reader = source.open()?;
    tracing::debug!(source = %source.describe(), detection = ?config.header_detection, "formatting outdated report");

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(config.format, stdout.lock());
    let summary = OutdatedFormatter::new(config.header_detection)
        .with_ignore(config.ignore)
        .format(reader, &mut writer)?;

    tracing::info!(rows = summary.rows, ignored = summary.ignored, "outdated report written");
    Ok(exit_codes::SUCCESS)
}
