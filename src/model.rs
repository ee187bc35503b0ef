/// Core data types for the incident review service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small constructors, and no I/O. Every type here
/// is an immutable value: callers build a new value instead of patching one
/// in place.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sentinel labels
// ---------------------------------------------------------------------------

/// Grouping key used for blank or whitespace-only field values.
pub const EMPTY_LABEL: &str = "(empty)";

/// Name of the synthetic entry that collects the folded long tail.
pub const OTHER_LABEL: &str = "Other";

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// A single incident, as delivered by the upload layer.
///
/// No field is guaranteed non-empty. Missing upstream values arrive as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRow {
    pub issue_key: String,   // e.g. "TSC-123"
    pub issue_links: String, // facet, e.g. "Payments, Billing"
    pub label: String,       // facet, e.g. "bug, urgent"
    pub comment: String,     // free text, may span lines
}

impl IncidentRow {
    pub fn new(
        issue_key: impl Into<String>,
        issue_links: impl Into<String>,
        label: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            issue_key: issue_key.into(),
            issue_links: issue_links.into(),
            label: label.into(),
            comment: comment.into(),
        }
    }

    /// True when all four fields are blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.issue_key.trim().is_empty()
            && self.issue_links.trim().is_empty()
            && self.label.trim().is_empty()
            && self.comment.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Distribution types
// ---------------------------------------------------------------------------

/// One category of a grouped breakdown.
///
/// `percent` is relative to the size of the dataset the distribution was
/// built from, rounded half-up to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub name: String,
    pub count: usize,
    pub percent: f64,
}

impl DistributionEntry {
    pub fn new(name: impl Into<String>, count: usize, percent: f64) -> Self {
        Self {
            name: name.into(),
            count,
            percent,
        }
    }
}

/// A selectable value for a multi-select facet, with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub name: String,
    pub count: usize,
}

/// Per-facet distributions computed at upload time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub by_issue_links: Vec<DistributionEntry>,
    pub by_label: Vec<DistributionEntry>,
}

// ---------------------------------------------------------------------------
// Upload types
// ---------------------------------------------------------------------------

/// Layout of the uploaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceFormat {
    /// Already cleaned export with `Issue Key` / `Label` headers.
    Preprocessed,
    /// Raw issue-tracker export with `Issue key` / `Labels` headers and
    /// metadata-prefixed comments.
    RawJira,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Preprocessed => write!(f, "PREPROCESSED"),
            SourceFormat::RawJira => write!(f, "RAW_JIRA"),
        }
    }
}

/// Result of ingesting one uploaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub items: Vec<IncidentRow>,
    pub stats: Stats,
    pub source_format: SourceFormat,
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Declarative filter over the dataset.
///
/// Selections are OR-ed within a facet and AND-ed across facets. An empty
/// selection or a blank query places no constraint. The presentation layer
/// replaces the whole value on every change; the helpers below therefore
/// return a new state rather than mutating `self`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub selected_issue_links: Vec<String>,
    pub selected_labels: Vec<String>,
    pub issue_key_query: String,
    pub comment_query: String,
}

impl FilterState {
    /// The state with no constraints.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn with_issue_key_query(&self, query: impl Into<String>) -> Self {
        Self {
            issue_key_query: query.into(),
            ..self.clone()
        }
    }

    pub fn with_comment_query(&self, query: impl Into<String>) -> Self {
        Self {
            comment_query: query.into(),
            ..self.clone()
        }
    }

    /// Adds `value` to the issue-links selection, or removes it if present.
    pub fn toggle_issue_link(&self, value: &str) -> Self {
        Self {
            selected_issue_links: toggled(&self.selected_issue_links, value),
            ..self.clone()
        }
    }

    /// Adds `value` to the label selection, or removes it if present.
    pub fn toggle_label(&self, value: &str) -> Self {
        Self {
            selected_labels: toggled(&self.selected_labels, value),
            ..self.clone()
        }
    }

    /// True if any facet or query would constrain the result.
    pub fn is_active(&self) -> bool {
        !self.selected_issue_links.is_empty()
            || !self.selected_labels.is_empty()
            || !self.issue_key_query.trim().is_empty()
            || !self.comment_query.trim().is_empty()
    }
}

fn toggled(values: &[String], value: &str) -> Vec<String> {
    if values.iter().any(|v| v == value) {
        values.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = values.to_vec();
        next.push(value.to_string());
        next
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when turning an uploaded table into incidents.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    /// One or more required column headers could not be resolved.
    MissingHeaders(Vec<String>),
    /// The table has more data rows than the configured limit.
    TooManyRows { limit: usize },
    /// The table had no header row at all.
    EmptyInput,
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::MissingHeaders(headers) => {
                write!(f, "missing required headers: {}", headers.join(", "))
            }
            IngestError::TooManyRows { limit } => {
                write!(f, "file has too many rows (limit {})", limit)
            }
            IngestError::EmptyInput => write!(f, "file contains no header row"),
        }
    }
}

impl std::error::Error for IngestError {}

/// Errors from the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Nothing has been uploaded in this session.
    NoData,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NoData => write!(f, "no data to export"),
        }
    }
}

impl std::error::Error for StoreError {}
