/// In-memory holder for the current upload session's dataset.
///
/// The dataset is replaced wholesale on every successful upload and dropped
/// on a failed one. Readers get a shared snapshot, so a concurrent upload
/// never exposes a half-replaced dataset.

use std::sync::{Arc, RwLock};

use crate::logging::{self, Component};
use crate::model::{IncidentRow, StoreError};

#[derive(Debug, Default)]
pub struct IncidentStore {
    latest: RwLock<Option<Arc<Vec<IncidentRow>>>>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session dataset.
    pub fn save(&self, items: Vec<IncidentRow>) {
        let count = items.len();
        let mut guard = self.latest.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(items));
        logging::info(Component::Store, None, &format!("stored {} incidents", count));
    }

    /// The most recently saved dataset.
    pub fn latest(&self) -> Result<Arc<Vec<IncidentRow>>, StoreError> {
        let guard = self.latest.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.as_ref().map(Arc::clone).ok_or(StoreError::NoData)
    }

    /// Discards the dataset, e.g. after a failed upload.
    pub fn clear(&self) {
        let mut guard = self.latest.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.take().is_some() {
            logging::debug(Component::Store, None, "session dataset cleared");
        }
    }
}
