//! Configuration structures for the stat recognition pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::ocr::PageSegmentation;

/// Main configuration for the statlens pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLensConfig {
    /// Image preprocessing configuration.
    pub preprocess: PreprocessConfig,

    /// OCR engine configuration.
    pub recognition: RecognitionConfig,

    /// Multi-scale voting configuration.
    pub reconcile: ReconcileConfig,

    /// Stat extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Image preprocessing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Linear contrast factor applied around mid-gray.
    pub contrast: f32,

    /// Brightness offset added after contrast (0-255 scale).
    pub brightness: f32,

    /// Optional post-filters for manual tuning. Off by default.
    pub filters: FilterConfig,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            // Tuned for light text on the dark game UI
            contrast: 1.8,
            brightness: 10.0,
            filters: FilterConfig::default(),
        }
    }
}

/// Optional raster post-filters. Applied in the order
/// invert, threshold (global or adaptive), morphology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Global binarization threshold: pixels above become white.
    pub threshold: Option<u8>,

    /// Locally adaptive binarization. Takes precedence over `threshold`.
    pub adaptive: Option<AdaptiveThreshold>,

    /// Invert the raster after thresholding.
    pub invert: bool,

    /// Morphological operator.
    pub morphology: Morphology,

    /// Square kernel radius for `morphology`.
    pub morphology_radius: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            adaptive: None,
            invert: false,
            morphology: Morphology::None,
            morphology_radius: 1,
        }
    }
}

/// Adaptive threshold parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThreshold {
    /// Side length of the local mean window.
    pub window: u32,
    /// Constant subtracted from the local mean.
    pub constant: i32,
}

impl Default for AdaptiveThreshold {
    fn default() -> Self {
        Self { window: 10, constant: 5 }
    }
}

/// Morphological operator selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Morphology {
    #[default]
    None,
    /// Local minimum.
    Erode,
    /// Local maximum.
    Dilate,
    /// Erode then dilate.
    Open,
    /// Dilate then erode.
    Close,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Tesseract language hint.
    pub language: String,

    /// Page segmentation mode.
    pub page_segmentation: PageSegmentation,

    /// Per-request timeout, measured from dispatch to the engine.
    pub timeout_secs: u64,

    /// Path to the tesseract executable (default: search PATH).
    pub tesseract_path: Option<PathBuf>,

    /// Directory with traineddata files (default: engine default).
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "kor+eng".to_string(),
            page_segmentation: PageSegmentation::SingleBlock,
            timeout_secs: 30,
            tesseract_path: None,
            tessdata_dir: None,
        }
    }
}

impl RecognitionConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Multi-scale voting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Scale factors, in voting order. Ties go to the earliest scale.
    pub scales: Vec<u32>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { scales: vec![1, 2, 3, 4] }
    }
}

/// Stat extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Name fragments of stats that are percentages with one decimal place.
    ///
    /// OCR tends to drop the decimal point on these ("242%" for "24.2%"), so a
    /// percentage above 100 without a decimal point is divided by ten.
    /// Determined empirically from screenshots.
    pub decimal_shift_families: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            decimal_shift_families: ["속도", "완벽", "재생", "강타", "철벽", "적중"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl StatLensConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
