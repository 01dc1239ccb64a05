//! JaCoCo CSV report parser.
//!
//! The CSV report has one header row with a fixed 13-column vocabulary and
//! one row per class, plus a `Total` summary row. Field splitting, quoting
//! and escaped quotes are handled by the `csv` crate; this module adds the
//! JaCoCo-specific header and numeric validation.

use crate::error::{CoverageError, Result};
use crate::file_utils;
use crate::model::CoverageRow;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::instrument;

/// Number of columns a JaCoCo CSV report carries.
pub const EXPECTED_COLUMN_COUNT: usize = 13;

/// Header vocabulary, in column order. Matched case-sensitively.
pub const EXPECTED_HEADERS: [&str; EXPECTED_COLUMN_COUNT] = [
    "GROUP",
    "PACKAGE",
    "CLASS",
    "INSTRUCTION_MISSED",
    "INSTRUCTION_COVERED",
    "BRANCH_MISSED",
    "BRANCH_COVERED",
    "LINE_MISSED",
    "LINE_COVERED",
    "COMPLEXITY_MISSED",
    "COMPLEXITY_COVERED",
    "METHOD_MISSED",
    "METHOD_COVERED",
];

/// Parse the CSV report at `path`.
///
/// A file with zero lines is [`CoverageError::EmptyInput`]; a file with only
/// the header yields an empty list.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn parse_csv_report(path: &Path) -> Result<Vec<CoverageRow>> {
    let content = file_utils::read_report(path)?;
    let rows = parse_csv_str(&content, path)?;
    tracing::debug!("Parsed {} CSV rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse CSV report `content`. `path` is only used in error messages.
///
/// The first physical line is the header. Every later line holds one record;
/// blank lines are skipped and reported line numbers are 1-based physical
/// lines.
pub fn parse_csv_str(content: &str, path: &Path) -> Result<Vec<CoverageRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().zip(1u64..);

    let Some((header, header_line)) = lines.next() else {
        return Err(CoverageError::empty_input(path));
    };
    validate_header(&split_fields(header, path, header_line)?, path, header_line)?;

    let mut rows = Vec::new();
    for (text, line) in lines {
        if text.trim().is_empty() {
            continue;
        }
        let record = split_fields(text, path, line)?;
        rows.push(parse_row(&record, path, line)?);
    }
    Ok(rows)
}

/// Split one line into trimmed fields with RFC 4180 quoting.
fn split_fields(text: &str, path: &Path, line: u64) -> Result<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Ok(record),
        Ok(false) => Ok(StringRecord::from(vec![""])),
        Err(e) => {
            let err = CoverageError::from(e).with_file(path);
            Err(match err {
                CoverageError::InvalidFormat {
                    file,
                    context,
                    source,
                    ..
                } => CoverageError::InvalidFormat {
                    file,
                    line: Some(line),
                    context,
                    source,
                },
                other => other,
            })
        }
    }
}

fn validate_header(record: &StringRecord, path: &Path, line: u64) -> Result<()> {
    if record.len() != EXPECTED_COLUMN_COUNT {
        return Err(CoverageError::invalid_format_at_line(
            path,
            line,
            format!(
                "Invalid header format: expected {} columns, got {}",
                EXPECTED_COLUMN_COUNT,
                record.len()
            ),
        ));
    }

    for (index, (actual, expected)) in record.iter().zip(EXPECTED_HEADERS).enumerate() {
        if actual != expected {
            return Err(CoverageError::invalid_format_at_line(
                path,
                line,
                format!(
                    "Invalid header at column {}: expected '{}', got '{}'",
                    index + 1,
                    expected,
                    actual
                ),
            ));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, path: &Path, line: u64) -> Result<CoverageRow> {
    if record.len() < EXPECTED_COLUMN_COUNT {
        return Err(CoverageError::invalid_format_at_line(
            path,
            line,
            format!(
                "Invalid CSV format: expected {} columns, got {}",
                EXPECTED_COLUMN_COUNT,
                record.len()
            ),
        ));
    }

    let text = |index: usize| record.get(index).unwrap_or_default().to_string();
    let number = |index: usize| -> Result<u64> {
        let value = record.get(index).unwrap_or_default();
        value.parse::<u64>().map_err(|_| {
            CoverageError::invalid_format_at_line(
                path,
                line,
                format!(
                    "Invalid integer value for {}: '{}'",
                    EXPECTED_HEADERS[index], value
                ),
            )
        })
    };

    Ok(CoverageRow {
        group: text(0),
        package_name: text(1),
        class_name: text(2),
        instruction_missed: number(3)?,
        instruction_covered: number(4)?,
        branch_missed: number(5)?,
        branch_covered: number(6)?,
        line_missed: number(7)?,
        line_covered: number(8)?,
        complexity_missed: number(9)?,
        complexity_covered: number(10)?,
        method_missed: number(11)?,
        method_covered: number(12)?,
    })
}
