//! WASM bindings for game stat panel OCR.
//!
//! The browser runs its own OCR engine; these bindings cover everything
//! around it: preparing the screenshot, extracting stats from the
//! recognized text and voting across scales.

use std::io::Cursor;

use image::ImageFormat;
use wasm_bindgen::prelude::*;

use statlens_core::models::config::PreprocessConfig;
use statlens_core::stats::catalog;
use statlens_core::{
    ImagePreprocessor, MultiScaleOcrResult, RecognizedStat, RelativeRect, StatCategory,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_category(category: &str) -> Result<StatCategory, JsValue> {
    StatCategory::from_id(category).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract stats from recognized text using the default decimal-shift families.
#[wasm_bindgen]
pub fn extract_stats(text: &str) -> Result<JsValue, JsValue> {
    to_js(&statlens_core::StatExtractor::new().extract(text))
}

/// Complete a stat list against a category's expected stats.
///
/// Stats outside the category are dropped and missing ones become
/// unrecognized placeholders.
#[wasm_bindgen]
pub fn fill_missing_stats(stats: JsValue, category: &str) -> Result<JsValue, JsValue> {
    let category = parse_category(category)?;
    let stats: Vec<RecognizedStat> = serde_wasm_bindgen::from_value(stats)?;

    to_js(&statlens_core::fill_missing_stats(&stats, category))
}

/// Vote across per-scale results (`{ scale, stats, rawText }[]`).
#[wasm_bindgen]
pub fn merge_scale_results(results: JsValue) -> Result<JsValue, JsValue> {
    let results: Vec<MultiScaleOcrResult> = serde_wasm_bindgen::from_value(results)?;
    if results.is_empty() {
        web_sys::console::warn_1(&"merge_scale_results called without any scale".into());
    }

    to_js(&statlens_core::merge_by_majority(&results))
}

/// Expected stat names of a category, in display order.
#[wasm_bindgen]
pub fn expected_stats(category: &str) -> Result<Vec<String>, JsValue> {
    let category = parse_category(category)?;
    Ok(category.expected_stats().iter().map(|s| s.to_string()).collect())
}

/// All categories as `{ id, label, description }`.
#[wasm_bindgen]
pub fn categories() -> Result<JsValue, JsValue> {
    #[derive(serde::Serialize)]
    struct CategoryInfo {
        id: &'static str,
        label: &'static str,
        description: &'static str,
    }

    let categories: Vec<CategoryInfo> = StatCategory::ALL
        .iter()
        .map(|c| CategoryInfo {
            id: c.id(),
            label: c.label(),
            description: c.description(),
        })
        .collect();

    to_js(&categories)
}

/// Canonical stat name for a known name or OCR misreading.
#[wasm_bindgen]
pub fn canonical_stat_name(literal: &str) -> Option<String> {
    catalog::canonical_name(literal).map(str::to_string)
}

/// Preprocess a screenshot and return the raster as PNG bytes.
///
/// `config` is an optional preprocessing config object; defaults apply
/// when it is `undefined` or `null`.
#[wasm_bindgen]
pub fn preprocess_image(bytes: &[u8], scale: u32, config: JsValue) -> Result<js_sys::Uint8Array, JsValue> {
    let config: PreprocessConfig = if config.is_undefined() || config.is_null() {
        PreprocessConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };

    let raster = ImagePreprocessor::from_config(&config)
        .preprocess_bytes(bytes, scale)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    encode_png(raster).map(|png| js_sys::Uint8Array::from(png.as_slice()))
}

fn encode_png(raster: image::GrayImage) -> Result<Vec<u8>, JsValue> {
    let mut png = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(png)
}

/// Stat extractor class for browser use.
#[wasm_bindgen]
pub struct StatExtractor {
    inner: statlens_core::StatExtractor,
    region: Option<RelativeRect>,
}

#[wasm_bindgen]
impl StatExtractor {
    /// Create a new stat extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: statlens_core::StatExtractor::new(),
            region: None,
        }
    }

    /// Replace the stat-name families whose percentages lost their decimal point.
    #[wasm_bindgen]
    pub fn set_shift_families(&mut self, families: Vec<String>) {
        self.inner = statlens_core::StatExtractor::new().with_shift_families(families);
    }

    /// Current decimal-shift families.
    #[wasm_bindgen]
    pub fn shift_families(&self) -> Vec<String> {
        self.inner.shift_families().to_vec()
    }

    /// Restrict `preprocess` to a relative region of the screenshot.
    #[wasm_bindgen]
    pub fn set_region(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.region = Some(RelativeRect { x, y, width, height });
    }

    /// Extract stats from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.extract(text))
    }

    /// Extract stats and complete them against a category.
    #[wasm_bindgen]
    pub fn extract_for_category(&self, text: &str, category: &str) -> Result<JsValue, JsValue> {
        let category = parse_category(category)?;
        let stats = self.inner.extract(text);
        to_js(&statlens_core::fill_missing_stats(&stats, category))
    }

    /// Extract stats with their byte positions in the text.
    #[wasm_bindgen]
    pub fn extract_with_positions(&self, text: &str) -> Result<JsValue, JsValue> {
        #[derive(serde::Serialize)]
        struct Located {
            stat: RecognizedStat,
            start: usize,
            end: usize,
            source: String,
        }

        let located: Vec<Located> = self
            .inner
            .extract_matches(text)
            .into_iter()
            .map(|m| Located {
                stat: m.stat,
                start: m.position.0,
                end: m.position.1,
                source: m.source,
            })
            .collect();

        to_js(&located)
    }

    /// Preprocess a screenshot with default settings and the configured region.
    #[wasm_bindgen]
    pub fn preprocess(&self, bytes: &[u8], scale: u32) -> Result<js_sys::Uint8Array, JsValue> {
        let mut preprocessor = ImagePreprocessor::new();
        if let Some(region) = self.region {
            preprocessor = preprocessor.with_region(region);
        }

        let raster = preprocessor
            .preprocess_bytes(bytes, scale)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        encode_png(raster).map(|png| js_sys::Uint8Array::from(png.as_slice()))
    }
}

impl Default for StatExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_extract_stats() {
        let value = extract_stats("공격력 1,234\n전투 속도 242%").unwrap();
        let stats: Vec<RecognizedStat> = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].value, "1234");
        assert_eq!(stats[1].value, "24.2%");
    }

    #[wasm_bindgen_test]
    fn test_expected_stats() {
        let names = expected_stats("basic").unwrap();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "공격력");
        assert!(expected_stats("misc").is_err());
    }

    #[wasm_bindgen_test]
    fn test_canonical_stat_name() {
        assert_eq!(canonical_stat_name("명증").as_deref(), Some("명중"));
        assert_eq!(canonical_stat_name("없는 능력치"), None);
    }

    #[wasm_bindgen_test]
    fn test_custom_shift_families() {
        let mut extractor = StatExtractor::new();
        extractor.set_shift_families(vec!["회피".to_string()]);

        let stats: Vec<RecognizedStat> =
            serde_wasm_bindgen::from_value(extractor.extract("회피 125%").unwrap()).unwrap();
        assert_eq!(stats[0].value, "12.5%");
    }
}
