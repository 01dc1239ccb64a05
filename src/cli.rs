use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// CLI arguments for `jacoco-console`.
///
/// Every option overrides the matching value of the configuration file.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "jacoco-console",
    version,
    about = "Display JaCoCo coverage reports as a console table"
)]
pub struct Cli {
    /// Path to the JaCoCo XML report. Takes precedence over --csv-path.
    #[arg(long, value_name = "FILE")]
    pub xml_path: Option<PathBuf>,

    /// Path to the JaCoCo CSV report (deprecated, prefer --xml-path).
    #[arg(long, value_name = "FILE")]
    pub csv_path: Option<PathBuf>,

    /// Comma-separated class names or packages to display, e.g. `com.example.service.*,com.example.model.User`.
    #[arg(long, value_name = "LIST")]
    pub classes: Option<String>,

    /// Show the total row.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub show_total: Option<bool>,

    /// Show one summary row per package (XML reports only).
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub show_package_summary: Option<bool>,

    /// Configuration file to use instead of searching for one.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}
