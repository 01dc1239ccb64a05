//! jacoco-console: print a JaCoCo coverage report as a console table.
//!
//! This program does the following:
//! 1. Loads `JacocoConsole.toml` (or the file given with `--config`).
//! 2. Merges it with the command-line arguments.
//! 3. Parses the XML (or deprecated CSV) report and applies the target patterns.
//! 4. Prints the coverage table, or a "no data" notice, on stdout.
//!
//! Any parse or configuration error exits non-zero. Logs go to stderr.
//!
//! USAGE EXAMPLE (run from your Gradle project root):
//!   jacoco-console --classes 'com.example.service.*' --show-total true

use clap::Parser;
use color_eyre::Section;
use color_eyre::eyre::{self, Result};
use jacoco_console_core::cli::Cli;
use jacoco_console_core::config::{self, JacocoConsoleConfig};
use jacoco_console_core::error::CoverageError;
use jacoco_console_core::pipeline::{self, PipelineOutput, ReportKind};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let loaded = config::load_config(cli.config.as_deref()).map_err(into_report)?;
    let verbose = config::resolve_verbose(&cli, loaded.as_ref().map(|(_, c)| c));
    init_tracing(verbose)?;

    let file_config = match loaded {
        Some((path, config)) => {
            tracing::debug!("Using configuration file {}", path.display());
            config
        }
        None => JacocoConsoleConfig::default(),
    };

    let settings = config::resolve_settings(&cli, &file_config).map_err(into_report)?;
    tracing::debug!("Resolved settings: {:?}", settings);
    if settings.kind == ReportKind::Csv {
        tracing::warn!(
            "CSV reports are deprecated. Consider using XML reports for better functionality including project totals."
        );
    }

    let output = pipeline::run_report(settings.kind, &settings.path, &settings.options)
        .map_err(into_report)?;
    match output {
        PipelineOutput::Rendered(table) => print!("{table}"),
        PipelineOutput::NoData(message) => println!("{message}"),
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins; otherwise `warn`, or
/// `debug` when verbose.
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Convert a library error into an eyre report carrying its recovery hints.
fn into_report(err: CoverageError) -> eyre::Report {
    let suggestions = err.suggestions();
    suggestions
        .into_iter()
        .fold(eyre::Report::new(err), |report, hint| report.suggestion(hint))
}
