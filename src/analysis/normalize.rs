//! Canonical keys for grouping and filter membership.
//!
//! Analytics and filters must agree on what a field value "is", otherwise a
//! slice clicked in a chart would select nothing in the table. Both go
//! through `ValueNormalizer`.

use crate::model::EMPTY_LABEL;

/// Maps raw field text to its grouping key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNormalizer {
    empty_label: String,
}

impl Default for ValueNormalizer {
    fn default() -> Self {
        Self::new(EMPTY_LABEL)
    }
}

impl ValueNormalizer {
    pub fn new(empty_label: impl Into<String>) -> Self {
        Self {
            empty_label: empty_label.into(),
        }
    }

    pub fn empty_label(&self) -> &str {
        &self.empty_label
    }

    /// Trims `raw`; blank input becomes the empty label. Case is preserved.
    pub fn key(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.empty_label.clone()
        } else {
            trimmed.to_string()
        }
    }
}

/// `ValueNormalizer::default().key(raw)`.
pub fn normalize_key(raw: &str) -> String {
    ValueNormalizer::default().key(raw)
}

/// Trimmed, lower-cased form used on both sides of a text search.
pub fn normalize_query(text: &str) -> String {
    text.trim().to_lowercase()
}
