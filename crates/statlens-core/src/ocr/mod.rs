//! Text recognition: image preprocessing, the engine adapter and the
//! serialized request queue in front of it.

pub mod filters;
mod preprocessing;

#[cfg(feature = "native")]
mod engine;
#[cfg(feature = "native")]
mod queue;
#[cfg(feature = "native")]
mod tesseract;

pub use preprocessing::{ImagePreprocessor, RelativeRect};

#[cfg(feature = "native")]
pub use engine::TextRecognizer;
#[cfg(feature = "native")]
pub use queue::{RecognitionQueue, RecognitionResponse};
#[cfg(feature = "native")]
pub use tesseract::{parse_tsv, TesseractCli};

use serde::{Deserialize, Serialize};

use crate::models::config::RecognitionConfig;

/// Tesseract page segmentation modes relevant to stat panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegmentation {
    /// Fully automatic page segmentation (PSM 3).
    Auto,
    /// A single column of text of variable sizes (PSM 4).
    SingleColumn,
    /// A single uniform block of text (PSM 6).
    #[default]
    SingleBlock,
    /// A single text line (PSM 7).
    SingleLine,
    /// As much text as possible in no particular order (PSM 11).
    SparseText,
    /// Sparse text with orientation detection (PSM 12).
    SparseTextOsd,
}

impl PageSegmentation {
    /// All supported modes.
    pub const ALL: [PageSegmentation; 6] = [
        Self::Auto,
        Self::SingleColumn,
        Self::SingleBlock,
        Self::SingleLine,
        Self::SparseText,
        Self::SparseTextOsd,
    ];

    /// Numeric mode passed to `--psm`.
    pub fn mode(&self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::SingleColumn => 4,
            Self::SingleBlock => 6,
            Self::SingleLine => 7,
            Self::SparseText => 11,
            Self::SparseTextOsd => 12,
        }
    }

    /// Look up a mode by its number.
    pub fn from_mode(mode: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.mode() == mode)
    }
}

/// A recognized word or line with the engine's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Recognized text.
    pub text: String,

    /// Confidence score (0.0 - 100.0, as reported by the engine).
    pub confidence: f32,
}

/// Engine output for one raster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    /// Full text, lines joined with newlines.
    pub text: String,

    /// Per-line spans, when the engine reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<TextSpan>,
}

impl RecognizedText {
    /// Text without span information.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Mean span confidence, if any spans were reported.
    pub fn mean_confidence(&self) -> Option<f32> {
        if self.spans.is_empty() {
            return None;
        }
        let sum: f32 = self.spans.iter().map(|s| s.confidence).sum();
        Some(sum / self.spans.len() as f32)
    }
}

/// Per-request recognition parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionOptions {
    /// Engine language hint, e.g. `kor+eng`.
    pub language: String,

    /// Page segmentation mode.
    pub page_segmentation: PageSegmentation,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self::from(&RecognitionConfig::default())
    }
}

impl From<&RecognitionConfig> for RecognitionOptions {
    fn from(config: &RecognitionConfig) -> Self {
        Self {
            language: config.language.clone(),
            page_segmentation: config.page_segmentation,
        }
    }
}
