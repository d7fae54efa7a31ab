//! Pure aggregation over the session table.
//!
//! Every function here is a deterministic, side-effect-free transform of a
//! slice of rows (the full table or a filtered subset). Aggregate views are
//! recomputed on every render and never persisted.
//!
//! Submodules:
//! - `summary` — counts, sums, distinct counts, grouped tallies, date bounds.
//! - `geo` — map center and marker derivation.
//! - `filter` — the emergency-type filter with its `All` sentinel.

pub mod filter;
pub mod geo;
pub mod summary;

pub use filter::{EmergencyFilter, emergency_types, filter_rows};
pub use geo::{map_center, markers};
pub use summary::{count, date_bounds, distinct, group_tally, sum_by_category, sum_numeric};
