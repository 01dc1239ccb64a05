//! Coverage counters.
//!
//! A [`Counter`] is the missed/covered pair JaCoCo reports for one metric
//! type. Entities keep their counters in a [`CounterMap`] keyed by metric type.

use std::collections::BTreeMap;

/// Instruction (bytecode) coverage.
pub const INSTRUCTION: &str = "INSTRUCTION";
/// Branch coverage.
pub const BRANCH: &str = "BRANCH";
/// Line coverage.
pub const LINE: &str = "LINE";
/// Cyclomatic complexity coverage.
pub const COMPLEXITY: &str = "COMPLEXITY";
/// Method coverage.
pub const METHOD: &str = "METHOD";
/// Class coverage.
pub const CLASS: &str = "CLASS";

/// Counters of one entity, keyed by metric type.
pub type CounterMap = BTreeMap<String, Counter>;

/// Missed/covered counts for a single metric type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    kind: String,
    missed: u64,
    covered: u64,
}

impl Counter {
    /// Create a counter for metric `kind`.
    pub fn new(kind: impl Into<String>, missed: u64, covered: u64) -> Self {
        Counter {
            kind: kind.into(),
            missed,
            covered,
        }
    }

    /// The metric type, e.g. `"INSTRUCTION"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Number of missed items.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Number of covered items.
    pub fn covered(&self) -> u64 {
        self.covered
    }

    /// `missed + covered`.
    pub fn total(&self) -> u64 {
        self.missed.saturating_add(self.covered)
    }

    /// Covered share in percent, `0.0` when there is nothing to cover.
    ///
    /// # Examples
    /// ```
    /// use jacoco_console_core::counter::Counter;
    ///
    /// assert_eq!(Counter::new("INSTRUCTION", 20, 80).percentage(), 80.0);
    /// assert_eq!(Counter::new("BRANCH", 0, 0).percentage(), 0.0);
    /// ```
    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.covered as f64 / total as f64) * 100.0
    }
}

/// Coverage percentage of metric `kind` in `counters`, `0.0` when absent.
pub fn coverage_of(counters: &CounterMap, kind: &str) -> f64 {
    counters.get(kind).map_or(0.0, Counter::percentage)
}

/// Insert `counter` keyed by its own metric type. A later counter of the same
/// type replaces an earlier one.
pub fn insert_counter(counters: &mut CounterMap, counter: Counter) {
    counters.insert(counter.kind.clone(), counter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_missed_plus_covered() {
        let counter = Counter::new(INSTRUCTION, 20, 80);
        assert_eq!(counter.total(), 100);
        assert_eq!(counter.kind(), "INSTRUCTION");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(Counter::new(INSTRUCTION, 20, 80).percentage(), 80.0);
        assert_eq!(Counter::new(BRANCH, 13, 27).percentage(), 67.5);
    }

    #[test]
    fn test_percentage_zero_total() {
        let counter = Counter::new(INSTRUCTION, 0, 0);
        assert_eq!(counter.total(), 0);
        assert_eq!(counter.percentage(), 0.0);
    }

    #[test]
    fn test_percentage_fully_missed_and_fully_covered() {
        assert_eq!(Counter::new(LINE, 7, 0).percentage(), 0.0);
        assert_eq!(Counter::new(LINE, 0, 7).percentage(), 100.0);
    }

    #[test]
    fn test_coverage_of_missing_metric_is_zero() {
        let mut counters = CounterMap::new();
        insert_counter(&mut counters, Counter::new(INSTRUCTION, 10, 90));
        assert_eq!(coverage_of(&counters, INSTRUCTION), 90.0);
        assert_eq!(coverage_of(&counters, BRANCH), 0.0);
    }

    #[test]
    fn test_insert_counter_replaces_same_kind() {
        let mut counters = CounterMap::new();
        insert_counter(&mut counters, Counter::new(METHOD, 1, 1));
        insert_counter(&mut counters, Counter::new(METHOD, 2, 3));
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[METHOD], Counter::new(METHOD, 2, 3));
    }
}
