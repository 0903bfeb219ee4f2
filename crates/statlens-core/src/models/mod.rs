//! Data models for recognized stats, categories, configuration and stat sheets.

pub mod category;
pub mod config;
pub mod sheet;
pub mod stat;

pub use category::StatCategory;
pub use config::StatLensConfig;
pub use sheet::{compare, expand_snapshot, SlotResult, StatDelta, StatSheet, StatSnapshot, Trend};
pub use stat::{MultiScaleOcrResult, RecognizedStat};
