//! Error types for the statlens-core library.

use thiserror::Error;

/// Main error type for the statlens library.
#[derive(Error, Debug)]
pub enum StatLensError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Stat extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to image preprocessing and text recognition.
///
/// Travels from the queue worker to the caller inside a response, so this
/// type is `Clone` and carries messages rather than source errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcrError {
    /// The source image could not be rasterized.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The source decoded to a zero-sized raster.
    #[error("image has no pixels")]
    EmptyImage,

    /// Scale factors start at 1.
    #[error("invalid scale factor: {0}")]
    InvalidScale(u32),

    /// The OCR engine could not be started.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine ran but reported a failure.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The request did not resolve in time.
    #[error("recognition request {request_id} timed out after {seconds}s")]
    Timeout { request_id: u64, seconds: u64 },

    /// The queue worker has shut down.
    #[error("recognition queue is closed")]
    QueueClosed,

    /// Every scale of a multi-scale run failed.
    #[error("all scales failed for category {category}")]
    AllScalesFailed { category: String },
}

/// Errors related to stat extraction and review.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Category identifier not in the catalog.
    #[error("unknown stat category: {0}")]
    UnknownCategory(String),

    /// Stat name not expected in the given category.
    #[error("unknown stat: {0}")]
    UnknownStat(String),

    /// Manually entered value is not a number.
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Result type for the statlens library.
pub type Result<T> = std::result::Result<T, StatLensError>;
