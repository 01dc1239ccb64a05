//! Target patterns and model filtering.
//!
//! A [`TargetPattern`] selects classes by full name or packages by display
//! name. Filtering the flat CSV model keeps matching rows; filtering the XML
//! tree keeps matching classes, drops emptied packages and recomputes every
//! parent counter from what is left.

use crate::aggregate::aggregate;
use crate::model::{CoveragePackage, CoverageReport, CoverageRow};
use std::fmt;

/// A parsed target pattern.
///
/// Wildcard rules are checked in this order: a trailing `*` makes a prefix
/// pattern, a leading `*` a suffix pattern, and a single inner `*` an infix
/// pattern. A pattern with more than one `*` in any other arrangement never
/// matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPattern {
    /// No wildcard: the candidate must be equal.
    Exact(String),
    /// `prefix*`
    Prefix(String),
    /// `*suffix`
    Suffix(String),
    /// `head*tail`
    Infix {
        /// Text before the `*`.
        head: String,
        /// Text after the `*`.
        tail: String,
    },
    /// Several wildcards in a shape no rule covers.
    Unmatchable(String),
}

impl TargetPattern {
    /// Parse `raw` into a pattern.
    ///
    /// # Examples
    /// ```
    /// use jacoco_console_core::filter::TargetPattern;
    ///
    /// let p = TargetPattern::parse("com.example.service.*");
    /// assert!(p.matches("com.example.service.UserService"));
    /// assert!(!p.matches("com.example.model.User"));
    /// ```
    pub fn parse(raw: &str) -> Self {
        if let Some(prefix) = raw.strip_suffix('*') {
            return TargetPattern::Prefix(prefix.to_string());
        }
        if let Some(suffix) = raw.strip_prefix('*') {
            return TargetPattern::Suffix(suffix.to_string());
        }
        match raw.matches('*').count() {
            0 => TargetPattern::Exact(raw.to_string()),
            1 => match raw.split_once('*') {
                Some((head, tail)) => TargetPattern::Infix {
                    head: head.to_string(),
                    tail: tail.to_string(),
                },
                None => TargetPattern::Unmatchable(raw.to_string()),
            },
            _ => TargetPattern::Unmatchable(raw.to_string()),
        }
    }

    /// Whether `candidate` is selected by this pattern.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            TargetPattern::Exact(name) => candidate == name,
            TargetPattern::Prefix(prefix) => candidate.starts_with(prefix.as_str()),
            TargetPattern::Suffix(suffix) => candidate.ends_with(suffix.as_str()),
            TargetPattern::Infix { head, tail } => {
                candidate.starts_with(head.as_str()) && candidate.ends_with(tail.as_str())
            }
            TargetPattern::Unmatchable(_) => false,
        }
    }
}

impl fmt::Display for TargetPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPattern::Exact(name) => write!(f, "{}", name),
            TargetPattern::Prefix(prefix) => write!(f, "{}*", prefix),
            TargetPattern::Suffix(suffix) => write!(f, "*{}", suffix),
            TargetPattern::Infix { head, tail } => write!(f, "{}*{}", head, tail),
            TargetPattern::Unmatchable(raw) => write!(f, "{}", raw),
        }
    }
}

/// An ordered set of patterns combined with logical OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<TargetPattern>,
}

impl PatternSet {
    /// Parse every entry of `raw`.
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        PatternSet {
            patterns: raw.iter().map(|p| TargetPattern::parse(p.as_ref())).collect(),
        }
    }

    /// Whether no pattern was given.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches any of `candidates`.
    pub fn matches_any(&self, candidates: &[&str]) -> bool {
        self.patterns
            .iter()
            .any(|p| candidates.iter().any(|c| p.matches(c)))
    }
}

/// Select CSV rows.
///
/// - no patterns, `show_total`: only the `Total` row(s)
/// - no patterns, otherwise: every row unchanged
/// - with patterns: class rows whose full class name or package display
///   name matches; `Total` rows are never matched
pub fn filter_rows(rows: &[CoverageRow], patterns: &PatternSet, show_total: bool) -> Vec<CoverageRow> {
    let selected: Vec<CoverageRow> = if patterns.is_empty() {
        if show_total {
            rows.iter().filter(|r| r.is_total()).cloned().collect()
        } else {
            rows.to_vec()
        }
    } else {
        rows.iter()
            .filter(|r| !r.is_total())
            .filter(|r| patterns.matches_any(&[&r.full_class_name(), r.package_display_name()]))
            .cloned()
            .collect()
    };
    tracing::debug!("Selected {} of {} CSV rows", selected.len(), rows.len());
    selected
}

/// Select classes of an XML report and re-aggregate.
///
/// Without patterns the report is returned unchanged. Otherwise only
/// matching classes are kept, packages left without classes are dropped and
/// package and report counters are recomputed from the retained classes.
pub fn filter_report(report: &CoverageReport, patterns: &PatternSet) -> CoverageReport {
    if patterns.is_empty() {
        return report.clone();
    }

    let packages: Vec<CoveragePackage> = report
        .packages
        .iter()
        .filter_map(|package| {
            let display_name = package.display_name();
            let classes: Vec<_> = package
                .classes
                .iter()
                .filter(|c| patterns.matches_any(&[&c.full_name(), &display_name]))
                .cloned()
                .collect();
            if classes.is_empty() {
                return None;
            }
            let counters = aggregate(classes.iter().map(|c| &c.counters));
            Some(CoveragePackage {
                name: package.name.clone(),
                classes,
                counters,
            })
        })
        .collect();

    let counters = aggregate(packages.iter().map(|p| &p.counters));
    let filtered = CoverageReport {
        name: report.name.clone(),
        packages,
        counters,
    };
    tracing::debug!(
        "Retained {} classes in {} packages",
        filtered.all_classes().count(),
        filtered.packages.len()
    );
    filtered
}
