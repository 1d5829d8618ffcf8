//! hippovol - Hippocampal Subfield Volume Collector
//!
//! Entry point for the CLI application.

use clap::Parser;
use hippovol::aggregate;
use hippovol::config::{CliArgs, OutputFormat, ReaderConfig};
use hippovol::error::{ReaderError, Result};
use hippovol::export;
use std::io;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// sysexits EX_NOINPUT: the run itself worked but no volume file matched
const EXIT_CODE_NO_INPUT: u8 = 66;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ReaderError::NoInputFound) => {
            eprintln!("Did not find any volume files matching the specified criteria.");
            ExitCode::from(EXIT_CODE_NO_INPUT)
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = ReaderConfig::from_args(args)?;
    let rows = aggregate::collect_volume_rows(&config)?;
    match config.output_format {
        OutputFormat::Csv => export::write_csv(&rows, io::stdout().lock())?,
    }
    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hippovol=debug,warn")
    } else {
        EnvFilter::new("hippovol=info,warn")
    };

    // stdout carries the CSV table; all diagnostics stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
