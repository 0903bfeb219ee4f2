//! Core library for game stat panel OCR.
//!
//! This crate provides:
//! - Image preprocessing (multi-scale upscaling, grayscale, contrast, tuning filters)
//! - A serialized recognition queue in front of a single OCR engine instance
//! - Stat extraction against a fixed Korean stat catalog with OCR alias tables
//! - Multi-scale majority voting and per-category gap filling
//! - Scan sessions and stat sheets for review, comparison and persistence hand-off

pub mod error;
pub mod models;
pub mod ocr;
pub mod stats;
#[cfg(feature = "native")]
pub mod pipeline;

pub use error::{ExtractionError, OcrError, Result, StatLensError};
pub use models::category::StatCategory;
pub use models::config::StatLensConfig;
pub use models::stat::{MultiScaleOcrResult, RecognizedStat};
pub use models::sheet::{compare, expand_snapshot, SlotResult, StatDelta, StatSheet, StatSnapshot, Trend};
pub use ocr::{ImagePreprocessor, PageSegmentation, RecognitionOptions, RecognizedText, RelativeRect, TextSpan};
pub use stats::{fill_missing_stats, merge_by_majority, StatExtractor, StatMatch};

#[cfg(feature = "native")]
pub use ocr::{RecognitionQueue, TesseractCli, TextRecognizer};
#[cfg(feature = "native")]
pub use pipeline::{ScanResult, ScanSession, StatPipeline};
