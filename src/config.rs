//! Configuration file support for jacoco-console.
//!
//! This module provides functionality to load configuration from TOML files
//! and merge them with command-line arguments. CLI arguments take precedence
//! over config file values.
//!
//! ```toml
//! [general]
//! verbose = false
//!
//! [report]
//! xml_path = "build/reports/jacoco/test/jacocoTestReport.xml"
//! show_total = true
//! show_package_summary = true
//! target_classes = ["com.example.service.*", "com.example.model.User"]
//! ```

use crate::cli::Cli;
use crate::error::{CoverageError, Result};
use crate::pipeline::{ReportKind, ReportOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for.
const DEFAULT_CONFIG_FILES: &[&str] = &[
    "JacocoConsole.toml",
    ".jacoco-console.toml",
    "jacoco-console.toml",
];

/// Where the JaCoCo Gradle task writes its XML report.
pub const DEFAULT_XML_REPORT_PATH: &str = "build/reports/jacoco/test/jacocoTestReport.xml";

/// Where the JaCoCo Gradle task writes its CSV report.
pub const DEFAULT_CSV_REPORT_PATH: &str = "build/reports/jacoco/test/jacocoTestReport.csv";

/// Main configuration structure representing a jacoco-console configuration file.
///
/// Configuration files use a merge strategy where:
/// 1. CLI arguments (highest priority)
/// 2. Config file values
/// 3. Default values (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct JacocoConsoleConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report selection and display settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Enable verbose (debug) logging.
    #[serde(default)]
    pub verbose: bool,
}

/// Report configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Path of the JaCoCo XML report.
    pub xml_path: Option<PathBuf>,

    /// Path of the JaCoCo CSV report. Setting it selects the CSV format
    /// unless an XML path is given as well.
    pub csv_path: Option<PathBuf>,

    /// Show the total row.
    #[serde(default = "default_true")]
    pub show_total: bool,

    /// Show per-package summary rows (XML only).
    #[serde(default = "default_true")]
    pub show_package_summary: bool,

    /// Class or package patterns to display. Empty displays everything.
    #[serde(default)]
    pub target_classes: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            xml_path: None,
            csv_path: None,
            show_total: true,
            show_package_summary: true,
            target_classes: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Load configuration from a specific file path.
///
/// # Arguments
///
/// * `path` - Path to the configuration file.
///
/// # Returns
///
/// Returns a `JacocoConsoleConfig` if the file exists and can be parsed.
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config_from_path(path: &Path) -> Result<Option<JacocoConsoleConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| CoverageError::ConfigError {
        message: format!("Failed to read configuration: {}", e),
        path: Some(path.to_path_buf()),
        source: Some(Box::new(e)),
    })?;

    let config: JacocoConsoleConfig =
        toml::from_str(&content).map_err(|e| CoverageError::ConfigError {
            message: format!("Failed to parse TOML: {}", e),
            path: Some(path.to_path_buf()),
            source: Some(Box::new(e)),
        })?;

    Ok(Some(config))
}

/// Search `start` and each of its parents for a default config file.
pub fn discover_config_from(start: &Path) -> Result<Option<(PathBuf, JacocoConsoleConfig)>> {
    let mut current_dir = start.to_path_buf();

    loop {
        for config_name in DEFAULT_CONFIG_FILES {
            let config_path = current_dir.join(config_name);
            if let Some(config) = load_config_from_path(&config_path)? {
                tracing::debug!("Loaded configuration from {}", config_path.display());
                return Ok(Some((config_path, config)));
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Ok(None)
}

/// Discover and load configuration from default locations.
///
/// Searches the current directory and its parents for `JacocoConsole.toml`,
/// `.jacoco-console.toml` or `jacoco-console.toml`.
pub fn discover_and_load_config() -> Result<Option<(PathBuf, JacocoConsoleConfig)>> {
    let current_dir = std::env::current_dir()?;
    discover_config_from(&current_dir)
}

/// Load configuration from a specified path or discover from default locations.
///
/// If `config_path` is `Some`, loads from that specific path.
/// If `config_path` is `None`, searches for default config files.
pub fn load_config(config_path: Option<&Path>) -> Result<Option<(PathBuf, JacocoConsoleConfig)>> {
    if let Some(path) = config_path {
        load_config_from_path(path).map(|opt| opt.map(|config| (path.to_path_buf(), config)))
    } else {
        discover_and_load_config()
    }
}

/// Check values serde cannot check.
///
/// Every target pattern must contain something other than whitespace.
pub fn validate_config(config: &JacocoConsoleConfig) -> Result<()> {
    if config
        .report
        .target_classes
        .iter()
        .any(|target| target.trim().is_empty())
    {
        return Err(CoverageError::invalid_input_with_arg(
            "Target class/package name cannot be blank",
            "report.target_classes",
        ));
    }
    Ok(())
}

/// Split a comma-separated `--classes` value into trimmed, non-empty patterns.
pub fn parse_class_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Everything the pipeline needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    /// Which format to read.
    pub kind: ReportKind,
    /// The report file.
    pub path: PathBuf,
    /// Filtering and display options.
    pub options: ReportOptions,
}

/// Whether debug logging was asked for on the command line or in `config`.
///
/// Resolved apart from [`resolve_settings`] so logging can be set up before
/// settings are validated.
pub fn resolve_verbose(cli: &Cli, config: Option<&JacocoConsoleConfig>) -> bool {
    cli.verbose || config.is_some_and(|c| c.general.verbose)
}

/// Merge CLI arguments with config file values.
///
/// Priority order:
/// 1. CLI arguments (highest priority)
/// 2. Config file values
/// 3. Default values (lowest priority)
///
/// The XML format is used when an XML path is given on the command line or in
/// the config, or when no CSV path is given anywhere.
pub fn resolve_settings(cli: &Cli, config: &JacocoConsoleConfig) -> Result<ReportSettings> {
    validate_config(config)?;

    let from_cli = cli.classes.as_deref().map(parse_class_list).unwrap_or_default();
    let target_patterns = if from_cli.is_empty() {
        config.report.target_classes.clone()
    } else {
        from_cli
    };

    let xml_requested = cli.xml_path.is_some() || config.report.xml_path.is_some();
    let csv_requested = cli.csv_path.is_some() || config.report.csv_path.is_some();
    let (kind, path) = if xml_requested || !csv_requested {
        let path = cli
            .xml_path
            .clone()
            .or_else(|| config.report.xml_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_XML_REPORT_PATH));
        (ReportKind::Xml, path)
    } else {
        let path = cli
            .csv_path
            .clone()
            .or_else(|| config.report.csv_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_REPORT_PATH));
        (ReportKind::Csv, path)
    };

    Ok(ReportSettings {
        kind,
        path,
        options: ReportOptions {
            target_patterns,
            show_total: cli.show_total.unwrap_or(config.report.show_total),
            show_package_summary: cli
                .show_package_summary
                .unwrap_or(config.report.show_package_summary),
        },
    })
}
