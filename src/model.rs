//! In-memory coverage models.
//!
//! The CSV report is flat: one [`CoverageRow`] per class plus a pre-computed
//! `Total` row. The XML report is a tree of [`CoverageReport`] →
//! [`CoveragePackage`] → [`CoverageClass`], each level carrying its own
//! counters. Models are built once by a parser and never mutated afterwards;
//! filtering produces new values.

use crate::counter::{self, Counter, CounterMap};

/// Class name JaCoCo uses for the summary row of a CSV report.
pub const TOTAL_CLASS_NAME: &str = "Total";

/// Display name of the package with an empty name.
pub const DEFAULT_PACKAGE_DISPLAY_NAME: &str = "(default package)";

/// One row of a JaCoCo CSV report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRow {
    /// Report group, usually the project name.
    pub group: String,
    /// Dot-separated package name, empty for the default package.
    pub package_name: String,
    /// Simple class name.
    pub class_name: String,
    /// Missed instructions.
    pub instruction_missed: u64,
    /// Covered instructions.
    pub instruction_covered: u64,
    /// Missed branches.
    pub branch_missed: u64,
    /// Covered branches.
    pub branch_covered: u64,
    /// Missed lines.
    pub line_missed: u64,
    /// Covered lines.
    pub line_covered: u64,
    /// Missed complexity.
    pub complexity_missed: u64,
    /// Covered complexity.
    pub complexity_covered: u64,
    /// Missed methods.
    pub method_missed: u64,
    /// Covered methods.
    pub method_covered: u64,
}

impl CoverageRow {
    /// `package.Class`, or just `Class` in the default package.
    pub fn full_class_name(&self) -> String {
        if self.package_name.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package_name, self.class_name)
        }
    }

    /// Package name as shown to users.
    pub fn package_display_name(&self) -> &str {
        if self.package_name.is_empty() {
            DEFAULT_PACKAGE_DISPLAY_NAME
        } else {
            &self.package_name
        }
    }

    /// Whether this is the pre-aggregated summary row of the file.
    pub fn is_total(&self) -> bool {
        self.class_name == TOTAL_CLASS_NAME
    }

    /// Instruction counter.
    pub fn instruction(&self) -> Counter {
        Counter::new(
            counter::INSTRUCTION,
            self.instruction_missed,
            self.instruction_covered,
        )
    }

    /// Branch counter.
    pub fn branch(&self) -> Counter {
        Counter::new(counter::BRANCH, self.branch_missed, self.branch_covered)
    }

    /// Line counter.
    pub fn line(&self) -> Counter {
        Counter::new(counter::LINE, self.line_missed, self.line_covered)
    }

    /// Complexity counter.
    pub fn complexity(&self) -> Counter {
        Counter::new(
            counter::COMPLEXITY,
            self.complexity_missed,
            self.complexity_covered,
        )
    }

    /// Method counter.
    pub fn method(&self) -> Counter {
        Counter::new(counter::METHOD, self.method_missed, self.method_covered)
    }

    /// All five counters of the row keyed by metric type.
    pub fn counters(&self) -> CounterMap {
        let mut counters = CounterMap::new();
        for c in [
            self.instruction(),
            self.branch(),
            self.line(),
            self.complexity(),
            self.method(),
        ] {
            counter::insert_counter(&mut counters, c);
        }
        counters
    }

    /// Instruction coverage in percent.
    pub fn instruction_coverage(&self) -> f64 {
        self.instruction().percentage()
    }

    /// Branch coverage in percent.
    pub fn branch_coverage(&self) -> f64 {
        self.branch().percentage()
    }
}

/// A class entry of an XML report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageClass {
    /// Slash-separated VM name, e.g. `com/example/Foo`.
    pub name: String,
    /// Source file the class was compiled from.
    pub source_filename: Option<String>,
    /// Counters declared directly on the class element.
    pub counters: CounterMap,
}

impl CoverageClass {
    /// Dot-separated class name.
    pub fn full_name(&self) -> String {
        self.name.replace('/', ".")
    }

    /// Instruction coverage in percent.
    pub fn instruction_coverage(&self) -> f64 {
        counter::coverage_of(&self.counters, counter::INSTRUCTION)
    }

    /// Branch coverage in percent.
    pub fn branch_coverage(&self) -> f64 {
        counter::coverage_of(&self.counters, counter::BRANCH)
    }
}

/// A package entry of an XML report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveragePackage {
    /// Slash-separated package name, empty for the default package.
    pub name: String,
    /// Classes in document order.
    pub classes: Vec<CoverageClass>,
    /// Package-level counters.
    pub counters: CounterMap,
}

impl CoveragePackage {
    /// Dot-separated name, or `(default package)` when the name is empty.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            DEFAULT_PACKAGE_DISPLAY_NAME.to_string()
        } else {
            self.name.replace('/', ".")
        }
    }

    /// Instruction coverage in percent.
    pub fn instruction_coverage(&self) -> f64 {
        counter::coverage_of(&self.counters, counter::INSTRUCTION)
    }

    /// Branch coverage in percent.
    pub fn branch_coverage(&self) -> f64 {
        counter::coverage_of(&self.counters, counter::BRANCH)
    }
}

/// A complete XML report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Report name, usually the project name.
    pub name: String,
    /// Packages in document order.
    pub packages: Vec<CoveragePackage>,
    /// Report-level counters.
    pub counters: CounterMap,
}

impl CoverageReport {
    /// All classes, in package order then class order.
    pub fn all_classes(&self) -> impl Iterator<Item = &CoverageClass> {
        self.packages.iter().flat_map(|p| p.classes.iter())
    }

    /// Whether the report contains at least one class.
    pub fn has_classes(&self) -> bool {
        self.packages.iter().any(|p| !p.classes.is_empty())
    }

    /// Instruction coverage in percent.
    pub fn instruction_coverage(&self) -> f64 {
        counter::coverage_of(&self.counters, counter::INSTRUCTION)
    }

    /// Branch coverage in percent.
    pub fn branch_coverage(&self) -> f64 {
        counter::coverage_of(&self.counters, counter::BRANCH)
    }
}
