/// Normalized export sheet, as plain data.
///
/// Produces the header row and one row per incident with the cell-level
/// hints (hyperlink target, text wrapping) a spreadsheet writer needs.
/// Encoding the workbook itself is left to the caller.

use serde::Serialize;

use crate::config::ExportConfig;
use crate::logging::{self, Component};
use crate::model::{IncidentRow, StoreError};
use crate::store::IncidentStore;

pub const EXPORT_HEADERS: [&str; 4] = ["Issue Key", "Custom Field (Issue Links)", "Label", "Comment"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCell {
    pub value: String,
    pub hyperlink: Option<String>,
    pub wrap_text: bool,
}

impl ExportCell {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            hyperlink: None,
            wrap_text: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSheet {
    pub sheet_name: String,
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<[ExportCell; 4]>,
}

/// Builds the export sheet for `items`, in their stored order.
///
/// The issue-key cell links to `issue_base_url + issue_key` when both are
/// non-blank. Comment cells are flagged for wrapping.
pub fn build_export_sheet(items: &[IncidentRow], config: &ExportConfig) -> ExportSheet {
    let rows = items
        .iter()
        .map(|item| {
            let hyperlink = if item.issue_key.trim().is_empty() || config.issue_base_url.is_empty() {
                None
            } else {
                Some(format!("{}{}", config.issue_base_url, item.issue_key))
            };
            [
                ExportCell {
                    hyperlink,
                    ..ExportCell::plain(&item.issue_key)
                },
                ExportCell::plain(&item.issue_links),
                ExportCell::plain(&item.label),
                ExportCell {
                    wrap_text: true,
                    ..ExportCell::plain(&item.comment)
                },
            ]
        })
        .collect();

    ExportSheet {
        sheet_name: config.sheet_name.clone(),
        file_name: config.file_name.clone(),
        headers: EXPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

/// Exports the unfiltered session dataset.
pub fn export_latest(store: &IncidentStore, config: &ExportConfig) -> Result<ExportSheet, StoreError> {
    let items = store.latest().inspect_err(|_| {
        logging::warn(Component::Export, None, "export requested before any upload");
    })?;
    let sheet = build_export_sheet(&items, config);
    logging::info(
        Component::Export,
        Some(&sheet.file_name),
        &format!("built export sheet with {} rows", sheet.rows.len()),
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExportConfig {
        ExportConfig {
            issue_base_url: "https://tracker.example.com/browse/".to_string(),
            ..ExportConfig::default()
        }
    }

    #[test]
    fn test_sheet_has_fixed_headers_and_names() {
        let sheet = build_export_sheet(&[], &config());
        assert_eq!(sheet.headers, vec!["Issue Key", "Custom Field (Issue Links)", "Label", "Comment"]);
        assert_eq!(sheet.sheet_name, "incidents");
        assert_eq!(sheet.file_name, "tsc_report_normalized.xlsx");
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_issue_key_cell_links_to_tracker() {
        let items = vec![IncidentRow::new("TSC-9", "Ops", "bug", "line one\nline two")];
        let sheet = build_export_sheet(&items, &config());
        let [key, links, label, comment] = &sheet.rows[0];

        assert_eq!(key.value, "TSC-9");
        assert_eq!(key.hyperlink.as_deref(), Some("https://tracker.example.com/browse/TSC-9"));
        assert_eq!(links.value, "Ops");
        assert_eq!(label.value, "bug");
        assert!(comment.wrap_text);
        assert!(!key.wrap_text);
    }

    #[test]
    fn test_blank_issue_key_has_no_link() {
        let items = vec![IncidentRow::new("", "Ops", "", "")];
        let sheet = build_export_sheet(&items, &config());
        assert_eq!(sheet.rows[0][0].hyperlink, None);
    }

    #[test]
    fn test_no_base_url_means_no_links() {
        let items = vec![IncidentRow::new("TSC-1", "", "", "")];
        let sheet = build_export_sheet(&items, &ExportConfig::default());
        assert_eq!(sheet.rows[0][0].hyperlink, None);
    }

    #[test]
    fn test_export_requires_an_upload() {
        let store = IncidentStore::new();
        assert_eq!(export_latest(&store, &config()), Err(StoreError::NoData));

        store.save(vec![IncidentRow::new("TSC-1", "", "", "")]);
        let sheet = export_latest(&store, &config()).expect("dataset present");
        assert_eq!(sheet.rows.len(), 1);
    }
}
