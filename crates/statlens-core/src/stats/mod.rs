//! Stat extraction, multi-scale voting and gap filling.

pub mod catalog;
mod extractor;
pub mod gap_fill;
pub mod normalize;
pub mod patterns;
mod reconcile;

pub use catalog::{KNOWN_STAT_NAMES, STAT_ALIASES};
pub use extractor::{StatExtractor, StatMatch};
pub use gap_fill::fill_missing_stats;
pub use normalize::normalize_value;
pub use reconcile::merge_by_majority;
