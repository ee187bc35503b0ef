//! Grouped count/percentage breakdowns.
//!
//! # Ordering
//! Entries are sorted by count descending. Ties are broken by name ascending
//! using `compare_names`: the Unicode lower-cased names are compared first,
//! then the raw names by code point. The result is a total order that does
//! not depend on the host locale, so chart legends and tests see the same
//! sequence on every machine.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::analysis::normalize::ValueNormalizer;
use crate::model::{DistributionEntry, IncidentRow};

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Groups `records` by `selector` (after normalization) and returns one entry
/// per distinct key, ordered by count descending then name ascending.
///
/// Returns an empty vec for an empty dataset.
pub fn build_distribution<F>(records: &[IncidentRow], selector: F) -> Vec<DistributionEntry>
where
    F: Fn(&IncidentRow) -> &str,
{
    build_distribution_with(records, selector, &ValueNormalizer::default())
}

/// Same as `build_distribution`, with an explicit normalizer.
pub fn build_distribution_with<F>(
    records: &[IncidentRow],
    selector: F,
    normalizer: &ValueNormalizer,
) -> Vec<DistributionEntry>
where
    F: Fn(&IncidentRow) -> &str,
{
    if records.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        *counts.entry(normalizer.key(selector(record))).or_insert(0) += 1;
    }

    let total = records.len();
    let mut entries: Vec<DistributionEntry> = counts
        .into_iter()
        .map(|(name, count)| DistributionEntry {
            percent: percent_of(count, total),
            name,
            count,
        })
        .collect();

    entries.sort_by(distribution_order);
    entries
}

// ---------------------------------------------------------------------------
// Ordering and rounding helpers
// ---------------------------------------------------------------------------

/// Count descending, then `compare_names`.
pub fn distribution_order(a: &DistributionEntry, b: &DistributionEntry) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Case-folded comparison with a code-point tie-break.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// `count / total` as a percentage, rounded half-up to one decimal.
/// A zero total yields `0.0`.
pub(crate) fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(count as f64 / total as f64 * 100.0)
}

/// Rounds a non-negative value half-up to one decimal place.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
