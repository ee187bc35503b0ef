//! Two-facet analytics view for an uploaded dataset.

use serde::Serialize;

use crate::analysis::distribution::build_distribution_with;
use crate::analysis::top_n::group_top_n_with;
use crate::config::AnalyticsConfig;
use crate::model::{DistributionEntry, IncidentRow};

/// Totals plus chart-ready (folded) distributions for both facets.
///
/// The unique counts are taken before folding, so they report the real
/// number of categories even when the charts show an "Other" slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_items: usize,
    pub unique_issue_links: usize,
    pub unique_labels: usize,
    pub issue_links_chart: Vec<DistributionEntry>,
    pub label_chart: Vec<DistributionEntry>,
}

/// Builds the summary using the labels and `top_n` from `config`.
pub fn summarize(records: &[IncidentRow], config: &AnalyticsConfig) -> AnalyticsSummary {
    let normalizer = config.normalizer();

    let by_issue_links = build_distribution_with(records, |r| r.issue_links.as_str(), &normalizer);
    let by_label = build_distribution_with(records, |r| r.label.as_str(), &normalizer);

    AnalyticsSummary {
        total_items: records.len(),
        unique_issue_links: by_issue_links.len(),
        unique_labels: by_label.len(),
        issue_links_chart: group_top_n_with(&by_issue_links, config.top_n, &config.other_label),
        label_chart: group_top_n_with(&by_label, config.top_n, &config.other_label),
    }
}
