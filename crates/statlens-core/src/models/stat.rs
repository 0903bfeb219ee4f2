//! Recognized stat values.

use serde::{Deserialize, Serialize};

/// One extracted measurement.
///
/// Serialized with camelCase keys, which is the shape the review UI and the
/// persistence collaborator exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedStat {
    /// Canonical stat name from the catalog.
    pub name: String,

    /// Numeric literal, optionally suffixed with `%`. Empty when unrecognized.
    pub value: String,

    /// Whether the value carries a percent sign.
    pub is_percentage: bool,

    /// False for placeholders inserted by the gap filler.
    pub is_recognized: bool,
}

impl RecognizedStat {
    /// A value read from OCR output.
    pub fn recognized(name: impl Into<String>, value: impl Into<String>, is_percentage: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_percentage,
            is_recognized: true,
        }
    }

    /// A placeholder for an expected stat no scale produced.
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            is_percentage: false,
            is_recognized: false,
        }
    }

    /// Whether a value is present.
    pub fn has_value(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// One scale's recognition output for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiScaleOcrResult {
    /// Upscaling factor used for this run.
    pub scale: u32,

    /// Stats extracted from this scale's text, in on-image order.
    pub stats: Vec<RecognizedStat>,

    /// Raw engine text.
    pub raw_text: String,
}

impl MultiScaleOcrResult {
    /// First stat with the given name, if this scale found it.
    pub fn find(&self, name: &str) -> Option<&RecognizedStat> {
        self.stats.iter().find(|s| s.name == name)
    }
}
