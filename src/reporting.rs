//! Fixed-width console table for coverage models.
//!
//! Both renderers share one layout: a framed title, a three column table
//! (name, instruction %, branch %) and a closing rule. Rendering assumes the
//! model has already been filtered and re-aggregated.

use crate::model::{CoverageClass, CoveragePackage, CoverageReport, CoverageRow};
use prettytable::format::{Alignment, FormatBuilder, TableFormat};
use prettytable::{Cell, Row, Table};
use std::fmt;

/// Width of the name column.
pub const NAME_WIDTH: usize = 50;
/// Width of each percentage column.
pub const PERCENT_WIDTH: usize = 15;
/// Total table width including the two column separators.
pub const TABLE_WIDTH: usize = NAME_WIDTH + 1 + PERCENT_WIDTH + 1 + PERCENT_WIDTH;
/// Title printed between the `=` rules.
pub const REPORT_TITLE: &str = "JaCoCo Coverage Report";

/// Label of the CSV summary row.
pub const TOTAL_LABEL: &str = "TOTAL";
/// Label of the XML report-level row.
pub const PROJECT_TOTAL_LABEL: &str = "PROJECT TOTAL";

const CLASS_INDENT: &str = "  ";

/// Render CSV rows sorted by full class name.
///
/// The `Total` row is labelled `TOTAL`; every other row is indented and
/// labelled with its full class name.
pub fn render_rows(rows: &[CoverageRow]) -> String {
    let mut sorted: Vec<(String, &CoverageRow)> =
        rows.iter().map(|r| (r.full_class_name(), r)).collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut table = CoverageTable::new();
    for (full_name, row) in sorted {
        let label = if row.is_total() {
            TOTAL_LABEL.to_string()
        } else {
            format!("{CLASS_INDENT}{full_name}")
        };
        table.add_row(
            &label,
            row.instruction_coverage(),
            row.branch_coverage(),
        );
    }
    table.to_string()
}

/// Render an XML report.
///
/// Row order: the `PROJECT TOTAL` row when `show_total`, one row per package
/// sorted by display name when `show_package_summary` and there is more than
/// one package, then every class sorted by full name.
pub fn render_report(report: &CoverageReport, show_total: bool, show_package_summary: bool) -> String {
    let mut table = CoverageTable::new();

    if show_total {
        table.add_row(
            PROJECT_TOTAL_LABEL,
            report.instruction_coverage(),
            report.branch_coverage(),
        );
    }

    if show_package_summary && report.packages.len() > 1 {
        let mut packages: Vec<(String, &CoveragePackage)> = report
            .packages
            .iter()
            .map(|p| (p.display_name(), p))
            .collect();
        packages.sort_by(|a, b| a.0.cmp(&b.0));
        for (display_name, package) in packages {
            table.add_row(
                &format!("{display_name} (package)"),
                package.instruction_coverage(),
                package.branch_coverage(),
            );
        }
    }

    let mut classes: Vec<(String, &CoverageClass)> =
        report.all_classes().map(|c| (c.full_name(), c)).collect();
    classes.sort_by(|a, b| a.0.cmp(&b.0));
    for (full_name, class) in classes {
        table.add_row(
            &format!("{CLASS_INDENT}{full_name}"),
            class.instruction_coverage(),
            class.branch_coverage(),
        );
    }

    table.to_string()
}

/// Two decimals, `.` as separator.
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}", value)
}

/// A framed coverage table.
///
/// Every line is laid out on its own, so a name longer than the name column
/// pushes only its own row past [`TABLE_WIDTH`]. The rules and the other rows
/// keep their fixed width.
struct CoverageTable {
    rows: Vec<String>,
}

impl CoverageTable {
    fn new() -> Self {
        CoverageTable { rows: Vec::new() }
    }

    fn add_row(&mut self, label: &str, instruction: f64, branch: f64) {
        self.rows.push(layout_line(Row::new(vec![
            Cell::new(&format!("{label:<NAME_WIDTH$}")),
            percent_cell(instruction),
            percent_cell(branch),
        ])));
    }
}

impl fmt::Display for CoverageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame_rule = "=".repeat(TABLE_WIDTH);
        let rule = "-".repeat(TABLE_WIDTH);

        writeln!(f)?;
        writeln!(f, "{frame_rule}")?;
        writeln!(f, "{REPORT_TITLE}")?;
        writeln!(f, "{frame_rule}")?;
        writeln!(f)?;
        writeln!(f, "{}", header_line())?;
        writeln!(f, "{rule}")?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f)
    }
}

fn line_format() -> TableFormat {
    FormatBuilder::new().column_separator(' ').padding(0, 0).build()
}

fn percent_cell(value: f64) -> Cell {
    Cell::new_align(
        &format!("{:>PERCENT_WIDTH$}", format_percentage(value)),
        Alignment::RIGHT,
    )
}

fn header_line() -> String {
    layout_line(Row::new(vec![
        Cell::new(&format!("{:<NAME_WIDTH$}", "Class/Package")),
        Cell::new_align(&format!("{:>PERCENT_WIDTH$}", "Instruction (%)"), Alignment::RIGHT),
        Cell::new_align(&format!("{:>PERCENT_WIDTH$}", "Branch (%)"), Alignment::RIGHT),
    ]))
}

/// Lay out a single row. Cells arrive pre-padded to their column width, so
/// the table only sizes columns wider for an overflowing cell of this row.
fn layout_line(row: Row) -> String {
    let mut table = Table::init(vec![row]);
    table.set_format(line_format());
    table.to_string().trim_end_matches(['\r', '\n']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterMap;
    use crate::model::test_support::{class, counters, row};

    fn data_lines(output: &str) -> Vec<&str> {
        output
            .lines()
            .skip_while(|l| !l.starts_with("Class/Package"))
            .skip(2)
            .take_while(|l| !l.starts_with('-'))
            .collect()
    }

    #[test]
    fn test_table_width() {
        assert_eq!(TABLE_WIDTH, 82);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(85.0), "85.00");
        assert_eq!(format_percentage(67.5), "67.50");
        assert_eq!(format_percentage(0.0), "0.00");
        assert_eq!(format_percentage(100.0), "100.00");
        assert_eq!(format_percentage(200.0 / 3.0), "66.67");
    }

    #[test]
    fn test_frame_and_rules_are_82_wide() {
        let output = render_rows(&[row("com.example", "TestClass", (10, 90), (5, 15))]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(82));
        assert_eq!(lines[2], REPORT_TITLE);
        assert_eq!(lines[3], "=".repeat(82));
        assert_eq!(lines[4], "");
        assert!(lines[5].starts_with("Class/Package"));
        assert_eq!(lines[5].len(), 82);
        assert!(lines[5].ends_with("Instruction (%)      Branch (%)"));
        assert_eq!(lines[6], "-".repeat(82));
        assert_eq!(lines[8], "-".repeat(82));
        assert!(output.ends_with(&format!("{}\n\n", "-".repeat(82))));
    }

    #[test]
    fn test_row_columns_are_aligned() {
        let output = render_rows(&[row("com.example", "TestClass", (10, 90), (5, 15))]);
        let line = data_lines(&output)[0];

        let expected = format!(
            "{:<50} {:>15} {:>15}",
            "  com.example.TestClass", "90.00", "75.00"
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn test_rows_are_sorted_and_total_relabelled() {
        let output = render_rows(&[
            row("com.example.service", "UserService", (20, 80), (8, 12)),
            row("", "Total", (30, 170), (13, 27)),
            row("com.example", "TestClass", (10, 90), (5, 15)),
        ]);
        let labels: Vec<&str> = data_lines(&output)
            .iter()
            .map(|l| l[..NAME_WIDTH].trim_end())
            .collect();

        assert_eq!(
            labels,
            ["TOTAL", "  com.example.TestClass", "  com.example.service.UserService"]
        );
    }

    #[test]
    fn test_zero_total_counters_render_as_zero() {
        let output = render_rows(&[row("p", "Empty", (0, 0), (0, 0))]);
        let line = data_lines(&output)[0];
        assert!(line.ends_with("           0.00            0.00"));
    }

    fn two_package_report() -> CoverageReport {
        CoverageReport {
            name: "test-project".to_string(),
            packages: vec![
                CoveragePackage {
                    name: "com/example/service".to_string(),
                    classes: vec![
                        class("com/example/service/UserService", (10, 40), (2, 8)),
                        class("com/example/service/OrderService", (10, 40), (8, 22)),
                    ],
                    counters: counters((20, 80), (10, 30)),
                },
                CoveragePackage {
                    name: "com/example/model".to_string(),
                    classes: vec![class("com/example/model/User", (5, 45), (3, 6))],
                    counters: counters((5, 45), (3, 6)),
                },
            ],
            counters: counters((25, 125), (13, 36)),
        }
    }

    #[test]
    fn test_report_row_order() {
        let output = render_report(&two_package_report(), true, true);
        let labels: Vec<&str> = data_lines(&output)
            .iter()
            .map(|l| l[..NAME_WIDTH].trim_end())
            .collect();

        assert_eq!(
            labels,
            [
                "PROJECT TOTAL",
                "com.example.model (package)",
                "com.example.service (package)",
                "  com.example.model.User",
                "  com.example.service.OrderService",
                "  com.example.service.UserService",
            ]
        );
    }

    #[test]
    fn test_report_total_and_summaries_can_be_hidden() {
        let output = render_report(&two_package_report(), false, false);
        assert!(!output.contains(PROJECT_TOTAL_LABEL));
        assert!(!output.contains("(package)"));
        assert_eq!(data_lines(&output).len(), 3);
    }

    #[test]
    fn test_single_package_has_no_summary_row() {
        let mut report = two_package_report();
        report.packages.truncate(1);
        let output = render_report(&report, true, true);
        assert!(!output.contains("(package)"));
    }

    #[test]
    fn test_project_total_uses_report_counters() {
        let output = render_report(&two_package_report(), true, false);
        let total = data_lines(&output)[0];
        assert!(total.starts_with(PROJECT_TOTAL_LABEL));
        assert!(total.ends_with("83.33           73.47"));
    }

    #[test]
    fn test_project_total_without_counters_is_zero() {
        let report = CoverageReport {
            name: "r".to_string(),
            packages: vec![CoveragePackage {
                name: String::new(),
                classes: vec![class("Root", (1, 1), (0, 0))],
                counters: CounterMap::new(),
            }],
            counters: CounterMap::new(),
        };
        let output = render_report(&report, true, true);
        assert!(data_lines(&output)[0].ends_with("0.00            0.00"));
    }

    #[test]
    fn test_long_name_overflows_only_its_own_row() {
        let long = format!("com.example.{}", "a".repeat(70));
        let output = render_rows(&[
            row("com.example", "Short", (0, 1), (0, 1)),
            row("com.example", &"a".repeat(70), (1, 1), (0, 1)),
        ]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[5].len(), TABLE_WIDTH);
        assert_eq!(lines[6], "-".repeat(TABLE_WIDTH));
        assert_eq!(lines[9], "-".repeat(TABLE_WIDTH));

        let rows = data_lines(&output);
        assert_eq!(rows[0].len(), TABLE_WIDTH);
        assert!(rows[0].starts_with("  com.example.Short "));
        assert_eq!(
            rows[1],
            format!("  {long} {:>15} {:>15}", "50.00", "100.00")
        );
    }
}
