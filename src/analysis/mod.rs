/// Analytics and filtering over the uploaded incident dataset.
///
/// Everything in here is pure: functions take the dataset by reference and
/// return freshly built values. They are cheap enough to recompute on every
/// facet toggle or keystroke, so nothing is cached between calls.
///
/// Submodules:
/// - `normalize` — canonical grouping keys and search normalization.
/// - `distribution` — grouped counts and percentages with a stable order.
/// - `top_n` — folds the long tail of a distribution into one entry.
/// - `filters` — facet and text-query filtering, facet option lists.
/// - `summary` — the two-facet analytics view shown after upload.

pub mod distribution;
pub mod filters;
pub mod normalize;
pub mod summary;
pub mod top_n;

pub use distribution::{build_distribution, build_distribution_with};
pub use filters::{apply_filters, apply_filters_with, facet_options, facet_options_with};
pub use normalize::{normalize_key, ValueNormalizer};
pub use top_n::{group_top_n, group_top_n_with};
