//! # jacoco-console - JaCoCo coverage in the terminal
//!
//! jacoco-console is a CLI tool and library that reads JaCoCo coverage
//! reports and prints them as a fixed-width console table. It provides:
//!
//! - **CSV parsing**: the flat per-class JaCoCo CSV report with its `Total` row
//! - **XML parsing**: the hierarchical report → package → class report
//! - **Filtering**: exact, `prefix*`, `*suffix` and `head*tail` target patterns
//! - **Re-aggregation**: package and project totals recomputed after filtering
//!
//! ## Architecture
//!
//! jacoco-console is organized into several modules:
//!
//! - [`cli`] - Command-line argument parsing
//! - [`config`] - Configuration file loading and merging with CLI arguments
//! - [`error`] - Centralized error types for the crate
//! - [`counter`] - Missed/covered counters and coverage percentages
//! - [`aggregate`] - Bottom-up counter aggregation
//! - [`model`] - CSV rows and the XML report tree
//! - [`file_utils`] - Report file access checks
//! - [`csv_parser`] - JaCoCo CSV parser
//! - [`xml_parser`] - JaCoCo XML parser
//! - [`filter`] - Target patterns and model filtering
//! - [`reporting`] - Console table rendering
//! - [`pipeline`] - Parse → filter → render orchestration for both formats
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use jacoco_console_core::{run_report, PipelineOutput, ReportKind, ReportOptions};
//! use std::path::Path;
//!
//! # fn main() -> jacoco_console_core::error::Result<()> {
//! let options = ReportOptions {
//!     target_patterns: vec!["com.example.model".to_string()],
//!     show_total: false,
//!     show_package_summary: true,
//! };
//!
//! let output = run_report(
//!     ReportKind::Xml,
//!     Path::new("build/reports/jacoco/test/jacocoTestReport.xml"),
//!     &options,
//! )?;
//! if let PipelineOutput::Rendered(table) = output {
//!     print!("{table}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! jacoco-console supports configuration files via [`JacocoConsoleConfig`].
//! See the [`config`] module for details on configuration file format and
//! loading.
//!
//! ## Error Handling
//!
//! All functions that can fail return [`Result<T>`], which is a type alias for
//! `std::result::Result<T, CoverageError>`. See the [`error`] module for
//! details on error types and handling.

// Module declarations
pub mod aggregate;
/// Command-line argument definitions.
pub mod cli;
pub mod config;
pub mod counter;
pub mod csv_parser;
pub mod error;
/// Report file access helpers.
pub mod file_utils;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod reporting;
pub mod xml_parser;

// Public API exports
pub use crate::cli::Cli;
pub use crate::counter::{Counter, CounterMap};
pub use crate::model::{CoverageClass, CoveragePackage, CoverageReport, CoverageRow};

// Parser exports
pub use crate::csv_parser::parse_csv_report;
pub use crate::xml_parser::parse_xml_report;

// Filter exports
pub use crate::filter::{PatternSet, TargetPattern, filter_report, filter_rows};

// Pipeline exports
pub use crate::pipeline::{
    CsvFormat, PipelineOutput, ReportFormat, ReportKind, ReportOptions, XmlFormat, run_report,
};

// Config exports
pub use crate::config::{
    GeneralConfig, JacocoConsoleConfig, ReportConfig, ReportSettings, load_config,
    load_config_from_path, resolve_settings, resolve_verbose,
};

// Error exports
pub use crate::error::{CoverageError as Error, Result};
