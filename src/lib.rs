//! Incident review core.
//!
//! Takes the rows of an uploaded incident spreadsheet and provides the
//! analytics, filtering and export data the review UI is built on.
//!
//! Modules:
//! - `model` — shared value types and error enums.
//! - `analysis` — normalization, distributions, top-N folding, filters.
//! - `ingest` — header detection and row cleanup for uploaded tables.
//! - `store` — the current session's dataset.
//! - `export` — the normalized export sheet.
//! - `config` — TOML configuration with environment overrides.
//! - `logging` — structured console/file logging.

pub mod analysis;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod store;

pub use analysis::{apply_filters, build_distribution, group_top_n, normalize_key};
pub use model::{DistributionEntry, FilterState, IncidentRow};
