//! Report Pipeline
//!
//! This module defines the [`ReportFormat`] trait, the common shape of the two
//! JaCoCo report formats. Every format runs the same pipeline:
//!
//! - parse the report file into its model
//! - select the part of the model the target patterns ask for
//! - check whether anything is left to show
//! - render the selection as a console table
//!
//! The CSV format is the degenerate single-level case: its `Total` row is a
//! literal row of the file, while the XML format recomputes every total after
//! filtering.
//!
//! # Running a report
//!
//! ```rust,no_run
//! use jacoco_console_core::pipeline::{run_report, PipelineOutput, ReportKind, ReportOptions};
//! use std::path::Path;
//!
//! # fn main() -> jacoco_console_core::error::Result<()> {
//! let options = ReportOptions {
//!     target_patterns: vec!["com.example.service.*".to_string()],
//!     show_total: true,
//!     show_package_summary: true,
//! };
//!
//! let path = Path::new("build/reports/jacoco/test/jacocoTestReport.xml");
//! match run_report(ReportKind::Xml, path, &options)? {
//!     PipelineOutput::Rendered(table) => print!("{table}"),
//!     PipelineOutput::NoData(message) => println!("{message}"),
//! }
//! # Ok(())
//! # }
//! ```

use crate::csv_parser;
use crate::error::Result;
use crate::filter::{self, PatternSet};
use crate::model::{CoverageReport, CoverageRow};
use crate::reporting;
use crate::xml_parser;
use std::fmt::{self, Debug};
use std::path::Path;

/// Shown when filtering leaves nothing to render.
pub const NO_MATCHING_DATA_MESSAGE: &str = "No coverage data found for the specified criteria.";

/// Shown when an XML report contains no classes at all.
pub const EMPTY_XML_REPORT_MESSAGE: &str = "No coverage data found in the XML report.";

/// The values a caller hands to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Patterns selecting classes or packages. Empty selects everything.
    pub target_patterns: Vec<String>,
    /// Show the total row.
    pub show_total: bool,
    /// Show one summary row per package (XML only).
    pub show_package_summary: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            target_patterns: Vec::new(),
            show_total: true,
            show_package_summary: true,
        }
    }
}

impl ReportOptions {
    fn patterns(&self) -> PatternSet {
        PatternSet::new(&self.target_patterns)
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutput {
    /// The rendered table.
    Rendered(String),
    /// Nothing matched; the message explains why.
    NoData(String),
}

impl PipelineOutput {
    /// The text to print, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            PipelineOutput::Rendered(text) | PipelineOutput::NoData(text) => text,
        }
    }
}

/// Common interface of the JaCoCo report formats.
///
/// Each format picks its own model through the associated type and gets
/// [`ReportFormat::run`] for free.
pub trait ReportFormat {
    /// The parsed form of a report.
    type Model: Debug;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Parse the report file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::CoverageError`] if the file is missing,
    /// unreadable, empty or malformed.
    fn parse(&self, path: &Path) -> Result<Self::Model>;

    /// Keep the part of `model` selected by `options`, recomputing any
    /// derived totals.
    fn select(&self, model: &Self::Model, options: &ReportOptions) -> Self::Model;

    /// A message when the parsed `model` has nothing worth filtering.
    fn empty_report_message(&self, _model: &Self::Model) -> Option<&'static str> {
        None
    }

    /// Whether a selected model has nothing left to show.
    fn is_empty(&self, model: &Self::Model) -> bool;

    /// Render a selected model.
    fn render(&self, model: &Self::Model, options: &ReportOptions) -> String;

    /// Parse, select and render the report at `path`.
    ///
    /// # Errors
    ///
    /// Propagates parse errors. An empty selection is not an error.
    fn run(&self, path: &Path, options: &ReportOptions) -> Result<PipelineOutput> {
        let model = self.parse(path)?;
        if let Some(message) = self.empty_report_message(&model) {
            tracing::debug!("{} report at {} is empty", self.name(), path.display());
            return Ok(PipelineOutput::NoData(message.to_string()));
        }

        let selected = self.select(&model, options);
        if self.is_empty(&selected) {
            tracing::debug!(
                "No {} coverage data matched {:?}",
                self.name(),
                options.target_patterns
            );
            return Ok(PipelineOutput::NoData(NO_MATCHING_DATA_MESSAGE.to_string()));
        }

        Ok(PipelineOutput::Rendered(self.render(&selected, options)))
    }
}

/// The flat CSV report.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvFormat;

impl ReportFormat for CsvFormat {
    type Model = Vec<CoverageRow>;

    fn name(&self) -> &'static str {
        "csv"
    }

    fn parse(&self, path: &Path) -> Result<Self::Model> {
        csv_parser::parse_csv_report(path)
    }

    fn select(&self, model: &Self::Model, options: &ReportOptions) -> Self::Model {
        filter::filter_rows(model, &options.patterns(), options.show_total)
    }

    fn is_empty(&self, model: &Self::Model) -> bool {
        model.is_empty()
    }

    fn render(&self, model: &Self::Model, _options: &ReportOptions) -> String {
        reporting::render_rows(model)
    }
}

/// The hierarchical XML report.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlFormat;

impl ReportFormat for XmlFormat {
    type Model = CoverageReport;

    fn name(&self) -> &'static str {
        "xml"
    }

    fn parse(&self, path: &Path) -> Result<Self::Model> {
        xml_parser::parse_xml_report(path)
    }

    fn empty_report_message(&self, model: &Self::Model) -> Option<&'static str> {
        (!model.has_classes()).then_some(EMPTY_XML_REPORT_MESSAGE)
    }

    fn select(&self, model: &Self::Model, options: &ReportOptions) -> Self::Model {
        filter::filter_report(model, &options.patterns())
    }

    fn is_empty(&self, model: &Self::Model) -> bool {
        !model.has_classes()
    }

    fn render(&self, model: &Self::Model, options: &ReportOptions) -> String {
        reporting::render_report(model, options.show_total, options.show_package_summary)
    }
}

/// Which report format to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// JaCoCo CSV report (deprecated in favour of XML).
    Csv,
    /// JaCoCo XML report.
    Xml,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Csv => write!(f, "CSV"),
            ReportKind::Xml => write!(f, "XML"),
        }
    }
}

/// Run the pipeline for the report of `kind` at `path`.
#[tracing::instrument(level = "debug", skip(options), fields(path = %path.display()))]
pub fn run_report(kind: ReportKind, path: &Path, options: &ReportOptions) -> Result<PipelineOutput> {
    match kind {
        ReportKind::Csv => CsvFormat.run(path, options),
        ReportKind::Xml => XmlFormat.run(path, options),
    }
}
