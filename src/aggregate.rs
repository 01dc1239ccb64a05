//! Bottom-up counter aggregation.
//!
//! Parent counters are the per-metric sums of their children. Aggregation is
//! pure and order-independent, so it can be applied to any subset of children
//! left over after filtering.

use crate::counter::{Counter, CounterMap};

/// Sum counters per metric type across all `maps`.
///
/// A metric type missing from one input contributes nothing from that input;
/// every metric type present in at least one input appears in the result.
///
/// # Examples
/// ```
/// use jacoco_console_core::aggregate::aggregate;
/// use jacoco_console_core::counter::{Counter, CounterMap, INSTRUCTION};
///
/// let mut a = CounterMap::new();
/// a.insert(INSTRUCTION.to_string(), Counter::new(INSTRUCTION, 10, 40));
/// let mut b = CounterMap::new();
/// b.insert(INSTRUCTION.to_string(), Counter::new(INSTRUCTION, 5, 45));
///
/// let total = aggregate([&a, &b]);
/// assert_eq!(total[INSTRUCTION], Counter::new(INSTRUCTION, 15, 85));
/// ```
pub fn aggregate<'a, I>(maps: I) -> CounterMap
where
    I: IntoIterator<Item = &'a CounterMap>,
{
    let mut sums: CounterMap = CounterMap::new();
    for counters in maps {
        for (kind, counter) in counters {
            let merged = match sums.get(kind) {
                Some(acc) => Counter::new(
                    kind.as_str(),
                    acc.missed().saturating_add(counter.missed()),
                    acc.covered().saturating_add(counter.covered()),
                ),
                None => Counter::new(kind.as_str(), counter.missed(), counter.covered()),
            };
            sums.insert(kind.clone(), merged);
        }
    }
    sums
}
