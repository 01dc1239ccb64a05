//! Error types for the coverage console.
//!
//! This module defines the error type shared by the parsers, the pipeline and
//! the configuration layer. Every failure is detected eagerly and carries
//! enough context (file, line, element or column) for the message to be shown
//! to the user verbatim.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Boxed error used as the underlying cause of parse and config failures.
type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for coverage report operations.
#[derive(Debug)]
pub enum CoverageError {
    /// The report file does not exist.
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The report file exists but could not be read.
    FileNotReadable {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying IO error, if any.
        source: Option<io::Error>,
    },

    /// The report content does not match the expected format.
    InvalidFormat {
        /// The file being parsed.
        file: Option<PathBuf>,
        /// 1-based line number responsible for the failure, if known.
        line: Option<u64>,
        /// Description of what was wrong.
        context: String,
        /// The underlying error.
        source: Option<BoxedSource>,
    },

    /// The report file has no content at all.
    EmptyInput {
        /// The empty file.
        path: PathBuf,
    },

    /// An error occurred while loading or parsing configuration.
    ConfigError {
        /// Description of the configuration issue.
        message: String,
        /// The config file path, if applicable.
        path: Option<PathBuf>,
        /// The underlying error.
        source: Option<BoxedSource>,
    },

    /// An error indicating an invalid argument or input.
    InvalidInput {
        /// Description of the invalid input.
        message: String,
        /// The argument or value that was invalid.
        argument: Option<String>,
    },
}

impl CoverageError {
    /// Creates a `FileNotFound` error for `path`.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a `FileNotReadable` error, optionally keeping the IO cause.
    pub fn file_not_readable(path: impl Into<PathBuf>, source: Option<io::Error>) -> Self {
        Self::FileNotReadable {
            path: path.into(),
            source,
        }
    }

    /// Creates an `InvalidFormat` error without file context.
    ///
    /// # Examples
    /// ```
    /// use jacoco_console_core::error::CoverageError;
    ///
    /// let err = CoverageError::invalid_format("root element should be 'report'");
    /// assert_eq!(err.name(), "InvalidFormat");
    /// ```
    pub fn invalid_format(context: impl Into<String>) -> Self {
        Self::InvalidFormat {
            file: None,
            line: None,
            context: context.into(),
            source: None,
        }
    }

    /// Creates an `InvalidFormat` error attributed to `file`.
    pub fn invalid_format_in(file: &Path, context: impl Into<String>) -> Self {
        Self::InvalidFormat {
            file: Some(file.to_path_buf()),
            line: None,
            context: context.into(),
            source: None,
        }
    }

    /// Creates an `InvalidFormat` error attributed to a line of `file`.
    pub fn invalid_format_at_line(file: &Path, line: u64, context: impl Into<String>) -> Self {
        Self::InvalidFormat {
            file: Some(file.to_path_buf()),
            line: Some(line),
            context: context.into(),
            source: None,
        }
    }

    /// Creates an `EmptyInput` error for `path`.
    pub fn empty_input(path: impl Into<PathBuf>) -> Self {
        Self::EmptyInput { path: path.into() }
    }

    /// Creates a new `ConfigError` with the given message.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Creates a new `ConfigError` with a file path.
    pub fn config_error_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::ConfigError {
            message: message.into(),
            path: Some(path),
            source: None,
        }
    }

    /// Creates a new `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            argument: None,
        }
    }

    /// Creates a new `InvalidInput` error with an argument name.
    pub fn invalid_input_with_arg(message: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            argument: Some(argument.into()),
        }
    }

    /// Attaches the file being parsed to an `InvalidFormat` error that lacks one.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn with_file(self, path: &Path) -> Self {
        match self {
            Self::InvalidFormat {
                file: None,
                line,
                context,
                source,
            } => Self::InvalidFormat {
                file: Some(path.to_path_buf()),
                line,
                context,
                source,
            },
            other => other,
        }
    }

    /// Returns the name of the error variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FileNotFound",
            Self::FileNotReadable { .. } => "FileNotReadable",
            Self::InvalidFormat { .. } => "InvalidFormat",
            Self::EmptyInput { .. } => "EmptyInput",
            Self::ConfigError { .. } => "ConfigError",
            Self::InvalidInput { .. } => "InvalidInput",
        }
    }

    /// Returns suggested recovery actions for the error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FileNotFound { .. } => vec![
                "Run the JaCoCo report task before rendering the report".to_string(),
                "Pass the report location with --xml-path or --csv-path".to_string(),
            ],
            Self::FileNotReadable { .. } => vec![
                "Verify you have permission to read the report file".to_string(),
                "Check that the path points to a file, not a directory".to_string(),
            ],
            Self::InvalidFormat { line, .. } => {
                let mut s = vec![
                    "Ensure the file is an unmodified JaCoCo CSV or XML report".to_string(),
                    "Regenerate the report with the JaCoCo report task".to_string(),
                ];
                if line.is_some() {
                    s.push("Inspect the reported line for stray or malformed values".to_string());
                }
                s
            }
            Self::EmptyInput { .. } => vec![
                "Regenerate the report; the file should at least contain a header row".to_string(),
            ],
            Self::ConfigError { .. } => vec![
                "Check the configuration file syntax".to_string(),
                "Ensure the file is valid TOML format".to_string(),
                "Remove keys that are not part of the [general] or [report] sections".to_string(),
            ],
            Self::InvalidInput { .. } => vec![
                "Review the command-line arguments".to_string(),
                "Target patterns must not be blank".to_string(),
            ],
        }
    }
}

impl fmt::Display for CoverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => {
                write!(f, "Report file not found: {}", path.display())
            }
            Self::FileNotReadable { path, .. } => {
                write!(f, "Report file is not readable: {}", path.display())
            }
            Self::InvalidFormat {
                file,
                line,
                context,
                ..
            } => match (file, line) {
                (Some(file), Some(line)) => write!(
                    f,
                    "Invalid format in '{}' at line {}: {}",
                    file.display(),
                    line,
                    context
                ),
                (Some(file), None) => {
                    write!(f, "Invalid format in '{}': {}", file.display(), context)
                }
                (None, Some(line)) => write!(f, "Invalid format at line {}: {}", line, context),
                (None, None) => write!(f, "Invalid format: {}", context),
            },
            Self::EmptyInput { path } => {
                write!(f, "Report file is empty: {}", path.display())
            }
            Self::ConfigError { message, path, .. } => {
                if let Some(p) = path {
                    write!(f, "Configuration error in '{}': {}", p.display(), message)
                } else {
                    write!(f, "Configuration error: {}", message)
                }
            }
            Self::InvalidInput { message, argument } => {
                if let Some(arg) = argument {
                    write!(f, "Invalid input '{}': {}", arg, message)
                } else {
                    write!(f, "Invalid input: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for CoverageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileNotReadable { source, .. } => source.as_ref().map(|e| e as _),
            Self::InvalidFormat { source, .. } => source.as_ref().map(|s| s.as_ref() as _),
            Self::ConfigError { source, .. } => source.as_ref().map(|s| s.as_ref() as _),
            Self::FileNotFound { .. } | Self::EmptyInput { .. } | Self::InvalidInput { .. } => {
                None
            }
        }
    }
}

// Implement From conversions for common error types

impl From<io::Error> for CoverageError {
    fn from(err: io::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to access configuration: {}", err),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for CoverageError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML: {}", err),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<csv::Error> for CoverageError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self::InvalidFormat {
            file: None,
            line,
            context: format!("Malformed CSV: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<quick_xml::Error> for CoverageError {
    fn from(err: quick_xml::Error) -> Self {
        Self::InvalidFormat {
            file: None,
            line: None,
            context: format!("Malformed XML: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for CoverageError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::InvalidFormat {
            file: None,
            line: None,
            context: format!("Malformed XML attribute: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

/// A type alias for `Result<T, CoverageError>`.
pub type Result<T> = std::result::Result<T, CoverageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display_names_path() {
        let err = CoverageError::file_not_found("build/report.xml");
        assert_eq!(err.name(), "FileNotFound");
        assert!(err.to_string().contains("build/report.xml"));
    }

    #[test]
    fn test_file_not_readable_keeps_io_source() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = CoverageError::file_not_readable("report.csv", Some(io_err));
        assert_eq!(err.name(), "FileNotReadable");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_format_display_with_file_and_line() {
        let err = CoverageError::invalid_format_at_line(
            Path::new("report.csv"),
            4,
            "Invalid integer value for BRANCH_MISSED: 'x'",
        );
        let display = err.to_string();
        assert!(display.contains("report.csv"));
        assert!(display.contains("line 4"));
        assert!(display.contains("BRANCH_MISSED"));
    }

    #[test]
    fn test_invalid_format_display_without_context() {
        let err = CoverageError::invalid_format("bad root");
        assert_eq!(err.to_string(), "Invalid format: bad root");
    }

    #[test]
    fn test_with_file_fills_missing_file() {
        let err = CoverageError::invalid_format("bad root").with_file(Path::new("r.xml"));
        assert!(matches!(
            err,
            CoverageError::InvalidFormat { file: Some(ref f), .. } if f == Path::new("r.xml")
        ));
    }

    #[test]
    fn test_with_file_leaves_other_variants_alone() {
        let err = CoverageError::empty_input("a.csv").with_file(Path::new("b.csv"));
        assert!(matches!(err, CoverageError::EmptyInput { ref path } if path == Path::new("a.csv")));
    }

    #[test]
    fn test_empty_input_display() {
        let err = CoverageError::empty_input("empty.csv");
        assert_eq!(err.name(), "EmptyInput");
        assert!(err.to_string().contains("empty.csv"));
    }

    #[test]
    fn test_config_error_with_path_display() {
        let err = CoverageError::config_error_with_path("invalid", PathBuf::from("/cfg.toml"));
        let display = err.to_string();
        assert!(display.contains("Configuration error"));
        assert!(display.contains("cfg.toml"));
    }

    #[test]
    fn test_invalid_input_with_arg_display() {
        let err = CoverageError::invalid_input_with_arg("pattern is blank", "--classes");
        assert_eq!(err.to_string(), "Invalid input '--classes': pattern is blank");
    }

    #[test]
    fn test_suggestions_mention_line_when_known() {
        let err = CoverageError::invalid_format_at_line(Path::new("r.csv"), 3, "bad");
        assert!(err.suggestions().iter().any(|s| s.contains("line")));
        let err = CoverageError::invalid_format("bad");
        assert!(!err.suggestions().iter().any(|s| s.contains("line")));
    }

    #[test]
    fn test_every_variant_has_suggestions() {
        let errors = [
            CoverageError::file_not_found("a"),
            CoverageError::file_not_readable("a", None),
            CoverageError::invalid_format("a"),
            CoverageError::empty_input("a"),
            CoverageError::config_error("a"),
            CoverageError::invalid_input("a"),
        ];
        for err in &errors {
            assert!(!err.suggestions().is_empty(), "{} has no suggestions", err.name());
        }
    }

    #[test]
    fn test_from_toml_de_error_creates_config_error() {
        let toml_err = toml::from_str::<toml::Value>("invalid = [unclosed").unwrap_err();
        let err: CoverageError = toml_err.into();
        assert!(matches!(err, CoverageError::ConfigError { .. }));
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_from_quick_xml_error_creates_invalid_format() {
        let mut reader = quick_xml::Reader::from_str("<report></package>");
        let xml_err = loop {
            match reader.read_event() {
                Err(e) => break e,
                Ok(quick_xml::events::Event::Eof) => panic!("Expected mismatched end tag error"),
                Ok(_) => {}
            }
        };
        let err: CoverageError = xml_err.into();
        assert!(matches!(err, CoverageError::InvalidFormat { .. }));
        assert!(err.to_string().contains("XML"));
    }
}
