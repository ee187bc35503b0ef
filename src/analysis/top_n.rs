//! Long-tail folding for chart display.

use crate::analysis::distribution::percent_of;
use crate::model::{DistributionEntry, OTHER_LABEL};

/// Keeps the first `n` entries of `distribution` and folds the rest into a
/// trailing `"Other"` entry.
///
/// `distribution` is expected in `build_distribution` order, so the kept
/// entries are the top `n` by count. A distribution with `n` or fewer
/// entries is returned unchanged.
pub fn group_top_n(distribution: &[DistributionEntry], n: usize) -> Vec<DistributionEntry> {
    group_top_n_with(distribution, n, OTHER_LABEL)
}

/// Same as `group_top_n`, naming the folded entry `other_label`.
///
/// The folded entry's percent is taken against the total count of the whole
/// input, not just the kept part, and it is always last even when its count
/// outranks kept entries.
pub fn group_top_n_with(
    distribution: &[DistributionEntry],
    n: usize,
    other_label: &str,
) -> Vec<DistributionEntry> {
    if distribution.len() <= n {
        return distribution.to_vec();
    }

    let total: usize = distribution.iter().map(|e| e.count).sum();
    let other_count: usize = distribution[n..].iter().map(|e| e.count).sum();

    let mut grouped = Vec::with_capacity(n + 1);
    grouped.extend_from_slice(&distribution[..n]);
    grouped.push(DistributionEntry {
        name: other_label.to_string(),
        count: other_count,
        percent: percent_of(other_count, total),
    });
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(counts: &[(&str, usize)]) -> Vec<DistributionEntry> {
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        counts
            .iter()
            .map(|(name, count)| DistributionEntry::new(*name, *count, percent_of(*count, total)))
            .collect()
    }

    #[test]
    fn test_short_distribution_is_returned_unchanged() {
        let d = dist(&[("a", 3), ("b", 2), ("c", 1)]);
        assert_eq!(group_top_n(&d, 3), d);
        assert_eq!(group_top_n(&d, 8), d);
        assert!(group_top_n(&[], 8).is_empty());
    }

    #[test]
    fn test_tail_folded_into_other() {
        let d = dist(&[("a", 5), ("b", 3), ("c", 1), ("d", 1)]);
        let grouped = group_top_n(&d, 2);

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].name, "a");
        assert_eq!(grouped[1].name, "b");
        assert_eq!(grouped[2], DistributionEntry::new("Other", 2, 20.0));
    }

    #[test]
    fn test_counts_are_conserved() {
        let d = dist(&[("a", 7), ("b", 4), ("c", 4), ("d", 2), ("e", 1), ("f", 1)]);
        let original: usize = d.iter().map(|e| e.count).sum();
        for n in 0..d.len() {
            let grouped = group_top_n(&d, n);
            let folded: usize = grouped.iter().map(|e| e.count).sum();
            assert_eq!(folded, original, "count not conserved for n = {}", n);
            assert_eq!(grouped.len(), n + 1);
            assert_eq!(grouped.last().unwrap().name, "Other");
        }
    }

    #[test]
    fn test_other_stays_last_even_when_largest() {
        let d = dist(&[("a", 2), ("b", 1), ("c", 1), ("d", 1), ("e", 1)]);
        let grouped = group_top_n(&d, 1);
        assert_eq!(grouped[0].name, "a");
        assert_eq!(grouped[1], DistributionEntry::new("Other", 4, 66.7));
    }

    #[test]
    fn test_zero_folds_everything() {
        let d = dist(&[("a", 1), ("b", 1)]);
        assert_eq!(group_top_n(&d, 0), vec![DistributionEntry::new("Other", 2, 100.0)]);
    }

    #[test]
    fn test_custom_other_label() {
        let d = dist(&[("a", 2), ("b", 1), ("c", 1)]);
        let grouped = group_top_n_with(&d, 1, "\u{1}other");
        assert_eq!(grouped[1].name, "\u{1}other");
    }
}
