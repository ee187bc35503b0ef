//! Row normalization for uploaded incident tables.
//!
//! Two layouts are accepted. A raw issue-tracker export (`Issue key`,
//! `Custom field (Issue Links)`, `Labels`, `Comment`) carries multi-valued
//! cells with mixed separators and comments prefixed with
//! `timestamp;author;` metadata, all of which are cleaned here. A
//! preprocessed sheet (`Issue Key`, `Custom Field (Issue Links)`, `Label`,
//! `Comment`) is only trimmed.

use std::collections::HashMap;

use crate::analysis::distribution::build_distribution_with;
use crate::analysis::normalize::ValueNormalizer;
use crate::logging::{self, Component};
use crate::model::{IncidentRow, IngestError, SourceFormat, Stats, UploadResponse};

// ---------------------------------------------------------------------------
// Header names
// ---------------------------------------------------------------------------

pub const PROCESSED_ISSUE_KEY: &str = "Issue Key";
pub const PROCESSED_ISSUE_LINKS: &str = "Custom Field (Issue Links)";
pub const PROCESSED_LABEL: &str = "Label";
pub const PROCESSED_COMMENT: &str = "Comment";

pub const RAW_ISSUE_KEY: &str = "Issue key";
pub const RAW_ISSUE_LINKS: &str = "Custom field (Issue Links)";
pub const RAW_LABEL: &str = "Labels";
pub const RAW_COMMENT: &str = "Comment";

const BOM: char = '\u{FEFF}';

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A decoded sheet: header cells in column order, then one map per data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularData {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl TabularData {
    /// Builds a table from positional rows. Short rows are padded with
    /// empty cells, extra cells are dropped.
    pub fn from_records(headers: &[&str], records: &[Vec<&str>]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (h.clone(), record.get(i).copied().unwrap_or("").to_string()))
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }
}

/// Header names for the four incident columns of one layout.
struct ColumnSet {
    issue_key: &'static str,
    issue_links: &'static str,
    label: &'static str,
    comment: &'static str,
}

impl ColumnSet {
    fn for_format(format: SourceFormat) -> Self {
        match format {
            SourceFormat::RawJira => ColumnSet {
                issue_key: RAW_ISSUE_KEY,
                issue_links: RAW_ISSUE_LINKS,
                label: RAW_LABEL,
                comment: RAW_COMMENT,
            },
            SourceFormat::Preprocessed => ColumnSet {
                issue_key: PROCESSED_ISSUE_KEY,
                issue_links: PROCESSED_ISSUE_LINKS,
                label: PROCESSED_LABEL,
                comment: PROCESSED_COMMENT,
            },
        }
    }

    fn required(&self) -> [&'static str; 4] {
        [self.issue_key, self.issue_links, self.label, self.comment]
    }
}

// ---------------------------------------------------------------------------
// Format detection and header resolution
// ---------------------------------------------------------------------------

/// Picks the layout from the header row. The raw issue-key header wins when
/// both spellings are present.
pub fn detect_source_format(headers: &[String]) -> Result<SourceFormat, IngestError> {
    let cleaned: Vec<String> = headers.iter().map(|h| clean_header(h)).collect();

    if cleaned.iter().any(|h| h == RAW_ISSUE_KEY) {
        return Ok(SourceFormat::RawJira);
    }
    if cleaned.iter().any(|h| h == PROCESSED_ISSUE_KEY) {
        return Ok(SourceFormat::Preprocessed);
    }
    Err(IngestError::MissingHeaders(vec![
        RAW_ISSUE_KEY.to_string(),
        PROCESSED_ISSUE_KEY.to_string(),
    ]))
}

/// Maps each required header to the header actually present in the sheet,
/// matching case-insensitively. The first matching sheet header wins.
/// All unresolved names are reported together.
pub fn resolve_required_headers(
    headers: &[String],
    required: &[&str],
) -> Result<HashMap<String, String>, IngestError> {
    let mut by_normalized: HashMap<String, &String> = HashMap::new();
    for header in headers {
        let normalized = normalize_header(header);
        if !normalized.is_empty() {
            by_normalized.entry(normalized).or_insert(header);
        }
    }

    let mut resolved = HashMap::new();
    let mut missing = Vec::new();
    for name in required {
        match by_normalized.get(&normalize_header(name)) {
            Some(actual) => {
                resolved.insert(name.to_string(), (*actual).clone());
            }
            None => missing.push(name.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(IngestError::MissingHeaders(missing))
    }
}

fn clean_header(header: &str) -> String {
    header.replace(BOM, "").trim().to_string()
}

fn normalize_header(header: &str) -> String {
    clean_header(header).to_lowercase()
}

// ---------------------------------------------------------------------------
// Cell cleanup
// ---------------------------------------------------------------------------

/// Strips the `timestamp;author;` prefix from every comment line, dropping
/// blank lines. Lines without that prefix are kept trimmed.
/// Any of `\r\n`, `\r` or `\n` ends a line.
pub fn clean_jira_comment(raw: &str) -> String {
    raw.split(|c: char| c == '\r' || c == '\n')
        .map(clean_jira_comment_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_jira_comment_line(line: &str) -> &str {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(3, ';');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(_), Some(text)) => text.trim(),
        _ => trimmed,
    }
}

/// Splits on commas, semicolons and any whitespace; rejoins with `", "`.
pub fn normalize_raw_labels(raw: &str) -> String {
    join_tokens(raw, |c| c == ',' || c == ';' || c.is_whitespace())
}

/// Splits on commas, semicolons and line breaks; rejoins with `", "`.
/// Spaces inside a link name are kept.
pub fn normalize_raw_issue_links(raw: &str) -> String {
    join_tokens(raw, |c| matches!(c, ',' | ';' | '\r' | '\n'))
}

fn join_tokens<P>(raw: &str, is_separator: P) -> String
where
    P: Fn(char) -> bool,
{
    raw.split(is_separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A literal `null` exported for a missing key is treated as no key.
fn normalize_issue_key(key: String) -> String {
    if key.eq_ignore_ascii_case("null") {
        String::new()
    } else {
        key
    }
}

fn resolved_column<'a>(resolved: &'a HashMap<String, String>, name: &'a str) -> &'a str {
    resolved.get(name).map(String::as_str).unwrap_or(name)
}

fn read_cell(row: &HashMap<String, String>, header: &str) -> String {
    row.get(header).map(|v| v.trim().to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Table ingestion
// ---------------------------------------------------------------------------

/// Normalizes every data row of `table` into an `IncidentRow`, skipping
/// rows that end up entirely blank, and computes the per-facet stats.
///
/// Fails if the layout cannot be detected, a required column is missing,
/// or the table has more than `max_rows` data rows.
pub fn ingest_table(table: &TabularData, max_rows: usize) -> Result<UploadResponse, IngestError> {
    ingest_table_with(table, max_rows, &ValueNormalizer::default())
}

/// Same as `ingest_table`, grouping the stats with `normalizer` so they
/// match the analytics and filters built from the same config.
pub fn ingest_table_with(
    table: &TabularData,
    max_rows: usize,
    normalizer: &ValueNormalizer,
) -> Result<UploadResponse, IngestError> {
    if table.headers.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    if table.rows.len() > max_rows {
        logging::warn(
            Component::Ingest,
            None,
            &format!("rejected upload with {} rows (limit {})", table.rows.len(), max_rows),
        );
        return Err(IngestError::TooManyRows { limit: max_rows });
    }

    let format = detect_source_format(&table.headers)?;
    let columns = ColumnSet::for_format(format);
    let resolved = resolve_required_headers(&table.headers, &columns.required())?;

    let mut items = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let issue_key = normalize_issue_key(read_cell(row, resolved_column(&resolved, columns.issue_key)));
        let mut issue_links = read_cell(row, resolved_column(&resolved, columns.issue_links));
        let mut label = read_cell(row, resolved_column(&resolved, columns.label));
        let mut comment = read_cell(row, resolved_column(&resolved, columns.comment));

        if format == SourceFormat::RawJira {
            issue_links = normalize_raw_issue_links(&issue_links);
            label = normalize_raw_labels(&label);
            comment = clean_jira_comment(&comment);
        }

        let incident = IncidentRow {
            issue_key,
            issue_links,
            label,
            comment,
        };
        if incident.is_blank() {
            continue;
        }
        items.push(incident);
    }

    logging::log_ingest_summary(&format.to_string(), table.rows.len(), items.len());

    let stats = Stats {
        by_issue_links: build_distribution_with(&items, |r| r.issue_links.as_str(), normalizer),
        by_label: build_distribution_with(&items, |r| r.label.as_str(), normalizer),
    };

    Ok(UploadResponse {
        items,
        stats,
        source_format: format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_HEADERS: [&str; 4] = ["Issue key", "Custom field (Issue Links)", "Labels", "Comment"];
    const PROCESSED_HEADERS: [&str; 4] = ["Issue Key", "Custom Field (Issue Links)", "Label", "Comment"];

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    // --- Format detection ---------------------------------------------------

    #[test]
    fn test_raw_issue_key_header_detects_raw_format() {
        assert_eq!(detect_source_format(&headers(&RAW_HEADERS)), Ok(SourceFormat::RawJira));
    }

    #[test]
    fn test_processed_issue_key_header_detects_preprocessed() {
        assert_eq!(
            detect_source_format(&headers(&PROCESSED_HEADERS)),
            Ok(SourceFormat::Preprocessed)
        );
    }

    #[test]
    fn test_bom_prefixed_header_is_recognised() {
        let h = headers(&["\u{FEFF}Issue key", "Labels"]);
        assert_eq!(detect_source_format(&h), Ok(SourceFormat::RawJira));
    }

    #[test]
    fn test_unknown_headers_report_both_key_spellings() {
        let result = detect_source_format(&headers(&["Foo", "Bar"]));
        assert_eq!(
            result,
            Err(IngestError::MissingHeaders(vec!["Issue key".into(), "Issue Key".into()]))
        );
    }

    #[test]
    fn test_missing_columns_reported_together() {
        let table = TabularData::from_records(&["Issue Key", "Label"], &[vec!["TSC-1", "bug"]]);
        let result = ingest_table(&table, 100);
        assert_eq!(
            result,
            Err(IngestError::MissingHeaders(vec![
                "Custom Field (Issue Links)".into(),
                "Comment".into(),
            ]))
        );
    }

    #[test]
    fn test_headers_resolve_case_insensitively() {
        let h = headers(&["Issue Key", "custom field (issue links)", " LABEL ", "comment"]);
        let resolved = resolve_required_headers(&h, &PROCESSED_HEADERS).expect("all headers present");
        assert_eq!(resolved["Label"], " LABEL ");
        assert_eq!(resolved["Custom Field (Issue Links)"], "custom field (issue links)");
    }

    // --- Cell cleanup -------------------------------------------------------

    #[test]
    fn test_single_line_comment_metadata_is_stripped() {
        assert_eq!(
            clean_jira_comment("25/Feb/26 10:06 AM;712020:uuid;actual comment text"),
            "actual comment text"
        );
    }

    #[test]
    fn test_multi_line_comment_cleans_each_line() {
        let raw = "25/Feb/26 10:06 AM;111:uuid;first line\n\n26/Feb/26 10:07 AM;222:uuid;second line";
        assert_eq!(clean_jira_comment(raw), "first line\nsecond line");
    }

    #[test]
    fn test_carriage_return_line_endings_split_comments() {
        assert_eq!(clean_jira_comment("t1;a1;first\rt2;a2;second"), "first\nsecond");
        assert_eq!(clean_jira_comment("t1;a1;first\r\nt2;a2;second\r\n"), "first\nsecond");
    }

    #[test]
    fn test_stats_use_configured_empty_label() {
        let table = TabularData::from_records(
            &PROCESSED_HEADERS,
            &[vec!["TSC-1", "", "bug", ""], vec!["TSC-2", "Ops", "", ""]],
        );

        let response = ingest_table_with(&table, 100, &ValueNormalizer::new("n/a")).unwrap();
        let links: Vec<_> = response.stats.by_issue_links.iter().map(|e| e.name.as_str()).collect();
        let labels: Vec<_> = response.stats.by_label.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(links, vec!["n/a", "Ops"]);
        assert_eq!(labels, vec!["bug", "n/a"]);
    }

    #[test]
    fn test_comment_without_metadata_is_kept() {
        assert_eq!(clean_jira_comment("  plain text comment  "), "plain text comment");
        assert_eq!(clean_jira_comment("a;b"), "a;b");
        assert_eq!(clean_jira_comment("   "), "");
    }

    #[test]
    fn test_comment_text_may_contain_semicolons() {
        assert_eq!(clean_jira_comment("ts;author;retry; then escalate"), "retry; then escalate");
    }

    #[test]
    fn test_raw_labels_mixed_separators() {
        assert_eq!(normalize_raw_labels("a b  c"), "a, b, c");
        assert_eq!(normalize_raw_labels("a, b; c\nd"), "a, b, c, d");
        assert_eq!(normalize_raw_labels(""), "");
    }

    #[test]
    fn test_raw_issue_links_keep_inner_spaces() {
        assert_eq!(normalize_raw_issue_links("Payments"), "Payments");
        assert_eq!(normalize_raw_issue_links("Payments, Billing"), "Payments, Billing");
        assert_eq!(normalize_raw_issue_links("Payments;\nBilling"), "Payments, Billing");
        assert_eq!(normalize_raw_issue_links("Card Ops;;"), "Card Ops");
    }

    // --- Table ingestion ----------------------------------------------------

    #[test]
    fn test_raw_table_is_fully_normalized() {
        let table = TabularData::from_records(
            &RAW_HEADERS,
            &[vec![
                "TSC-10",
                "Payments;\nBilling",
                "bug urgent",
                "25/Feb/26 10:06 AM;712020:uuid;text of comment",
            ]],
        );

        let response = ingest_table(&table, 100).expect("raw table should ingest");

        assert_eq!(response.source_format, SourceFormat::RawJira);
        assert_eq!(
            response.items,
            vec![IncidentRow::new("TSC-10", "Payments, Billing", "bug, urgent", "text of comment")]
        );
    }

    #[test]
    fn test_preprocessed_table_keeps_label_untouched() {
        let table = TabularData::from_records(
            &PROCESSED_HEADERS,
            &[vec![" TSC-4 ", "Ops", "bug urgent sev1", "a;b;c"]],
        );

        let response = ingest_table(&table, 100).expect("preprocessed table should ingest");

        assert_eq!(response.source_format, SourceFormat::Preprocessed);
        assert_eq!(response.items, vec![IncidentRow::new("TSC-4", "Ops", "bug urgent sev1", "a;b;c")]);
    }

    #[test]
    fn test_null_issue_key_becomes_empty() {
        let table = TabularData::from_records(&PROCESSED_HEADERS, &[vec![" null ", "Ops", "bug", "x"]]);
        let response = ingest_table(&table, 100).unwrap();
        assert_eq!(response.items[0].issue_key, "");
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let table = TabularData::from_records(
            &PROCESSED_HEADERS,
            &[vec!["   ", " ", "", "  "], vec!["TSC-1", "", "", ""], vec![]],
        );
        let response = ingest_table(&table, 100).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].issue_key, "TSC-1");
    }

    #[test]
    fn test_row_limit_is_enforced() {
        let records = vec![
            vec!["TSC-1", "A", "L1", "c1"],
            vec!["TSC-2", "B", "L2", "c2"],
            vec!["TSC-3", "C", "L3", "c3"],
        ];
        let table = TabularData::from_records(&PROCESSED_HEADERS, &records);

        assert_eq!(ingest_table(&table, 2), Err(IngestError::TooManyRows { limit: 2 }));
        assert!(ingest_table(&table, 3).is_ok(), "exactly at the limit is accepted");
    }

    #[test]
    fn test_empty_header_row_is_rejected() {
        assert_eq!(ingest_table(&TabularData::default(), 10), Err(IngestError::EmptyInput));
    }

    #[test]
    fn test_stats_are_computed_over_kept_rows() {
        let table = TabularData::from_records(
            &PROCESSED_HEADERS,
            &[
                vec!["TSC-1", "Payments", "bug", ""],
                vec!["TSC-2", "Payments", "", ""],
                vec!["TSC-3", "Billing", "bug", ""],
                vec!["", "", "", ""],
            ],
        );

        let response = ingest_table(&table, 100).unwrap();
        let links: Vec<_> = response
            .stats
            .by_issue_links
            .iter()
            .map(|e| (e.name.as_str(), e.count))
            .collect();
        assert_eq!(links, vec![("Payments", 2), ("Billing", 1)]);
        assert_eq!(response.stats.by_label[0].name, "bug");
        assert_eq!(response.stats.by_label[1].name, "(empty)");
    }
}
