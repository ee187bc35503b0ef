//! Facet and text-query filtering over the incident table.
//!
//! Facet membership uses the same canonical key as the analytics
//! distributions, so a blank label is selected as `"(empty)"` in both places.
//! Text queries are trimmed, lower-cased substring matches.

use crate::analysis::distribution::build_distribution_with;
use crate::analysis::normalize::{normalize_query, ValueNormalizer};
use crate::model::{FacetOption, FilterState, IncidentRow};

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Returns the records matching every constraint in `filters`, in input order.
pub fn apply_filters(records: &[IncidentRow], filters: &FilterState) -> Vec<IncidentRow> {
    apply_filters_with(records, filters, &ValueNormalizer::default())
}

/// Same as `apply_filters`, with an explicit normalizer for facet keys.
pub fn apply_filters_with(
    records: &[IncidentRow],
    filters: &FilterState,
    normalizer: &ValueNormalizer,
) -> Vec<IncidentRow> {
    let issue_key_query = normalize_query(&filters.issue_key_query);
    let comment_query = normalize_query(&filters.comment_query);

    records
        .iter()
        .filter(|record| {
            facet_matches(&filters.selected_issue_links, &record.issue_links, normalizer)
                && facet_matches(&filters.selected_labels, &record.label, normalizer)
                && query_matches(&issue_key_query, &record.issue_key)
                && query_matches(&comment_query, &record.comment)
        })
        .cloned()
        .collect()
}

fn facet_matches(selected: &[String], raw: &str, normalizer: &ValueNormalizer) -> bool {
    if selected.is_empty() {
        return true;
    }
    let key = normalizer.key(raw);
    selected.iter().any(|value| *value == key)
}

/// `query` must already be normalized.
fn query_matches(query: &str, field: &str) -> bool {
    query.is_empty() || normalize_query(field).contains(query)
}

// ---------------------------------------------------------------------------
// Facet options
// ---------------------------------------------------------------------------

/// Distinct canonical values of a facet with their counts, in distribution
/// order. Used to populate the multi-select lists.
pub fn facet_options<F>(records: &[IncidentRow], selector: F) -> Vec<FacetOption>
where
    F: Fn(&IncidentRow) -> &str,
{
    facet_options_with(records, selector, &ValueNormalizer::default())
}

/// Same as `facet_options`, with an explicit normalizer.
pub fn facet_options_with<F>(
    records: &[IncidentRow],
    selector: F,
    normalizer: &ValueNormalizer,
) -> Vec<FacetOption>
where
    F: Fn(&IncidentRow) -> &str,
{
    build_distribution_with(records, selector, normalizer)
        .into_iter()
        .map(|entry| FacetOption {
            name: entry.name,
            count: entry.count,
        })
        .collect()
}

/// Whether clicking a chart slice called `name` should toggle a facet value.
/// The folded bucket is not a real value and is never selectable.
pub fn is_selectable_slice(name: &str, other_label: &str) -> bool {
    !name.trim().is_empty() && name != other_label
}
