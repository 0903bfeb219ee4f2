//! Multi-scale stat recognition pipeline.
//!
//! Decodes a screenshot once, then for every configured scale preprocesses,
//! recognizes through the shared queue and extracts stats. Per-scale results
//! are merged by majority vote and completed against the category's expected
//! stats.

mod session;

pub use session::ScanSession;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{OcrError, Result};
use crate::models::config::StatLensConfig;
use crate::models::sheet::SlotResult;
use crate::models::{MultiScaleOcrResult, RecognizedStat, StatCategory};
use crate::ocr::{ImagePreprocessor, RecognitionOptions, RecognitionQueue, TesseractCli};
use crate::stats::{fill_missing_stats, merge_by_majority, StatExtractor};

/// Outcome of scanning one screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Category the screenshot was scanned as.
    pub category: StatCategory,

    /// One entry per expected stat, in catalog order.
    pub stats: Vec<RecognizedStat>,

    /// Raw text of the 2x scale, or of the first scale that succeeded.
    pub raw_text: String,

    /// Results of the scales that succeeded, in scale order.
    pub per_scale: Vec<MultiScaleOcrResult>,

    /// Scales dropped from the vote.
    pub failed_scales: Vec<u32>,
}

impl ScanResult {
    /// Number of expected stats that were recognized.
    pub fn recognized_count(&self) -> usize {
        self.stats.iter().filter(|s| s.is_recognized).count()
    }
}

impl From<ScanResult> for SlotResult {
    fn from(result: ScanResult) -> Self {
        Self {
            stats: result.stats,
            raw_text: result.raw_text,
            per_scale: result.per_scale,
            updated_at: None,
        }
    }
}

/// Screenshot to stats.
pub struct StatPipeline {
    preprocessor: ImagePreprocessor,
    queue: Arc<RecognitionQueue>,
    extractor: StatExtractor,
    options: RecognitionOptions,
    scales: Vec<u32>,
}

impl StatPipeline {
    /// Create a pipeline with default settings on top of an existing queue.
    pub fn new(queue: Arc<RecognitionQueue>) -> Self {
        Self::from_config(&StatLensConfig::default(), queue)
    }

    /// Create a pipeline from configuration on top of an existing queue.
    pub fn from_config(config: &StatLensConfig, queue: Arc<RecognitionQueue>) -> Self {
        Self {
            preprocessor: ImagePreprocessor::from_config(&config.preprocess),
            queue,
            extractor: StatExtractor::from_config(&config.extraction),
            options: RecognitionOptions::from(&config.recognition),
            scales: config.reconcile.scales.clone(),
        }
    }

    /// Spawn a Tesseract-backed queue and build a pipeline on it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_tesseract(config: &StatLensConfig) -> Self {
        let engine = TesseractCli::from_config(&config.recognition);
        let queue = RecognitionQueue::spawn(engine, config.recognition.timeout());
        Self::from_config(config, Arc::new(queue))
    }

    /// Replace the preprocessor.
    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Replace the extractor.
    pub fn with_extractor(mut self, extractor: StatExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the scale factors, in voting order.
    pub fn with_scales(mut self, scales: Vec<u32>) -> Self {
        self.scales = scales;
        self
    }

    /// Scale factors in voting order.
    pub fn scales(&self) -> &[u32] {
        &self.scales
    }

    /// The recognition queue.
    pub fn queue(&self) -> &Arc<RecognitionQueue> {
        &self.queue
    }

    /// Scan an encoded screenshot as `category`.
    ///
    /// A decode failure fails the scan. A scale that fails to preprocess or
    /// recognize is dropped from the vote; the scan fails only when every
    /// scale does.
    pub async fn scan(&self, bytes: &[u8], category: StatCategory) -> Result<ScanResult> {
        let image = self.preprocessor.decode(bytes)?;
        info!("Scanning {} screenshot at scales {:?}", category, self.scales);

        let mut per_scale = Vec::with_capacity(self.scales.len());
        let mut failed_scales = Vec::new();

        for &scale in &self.scales {
            let raster = match self.preprocessor.preprocess(&image, scale) {
                Ok(raster) => raster,
                Err(e) => {
                    warn!("Preprocessing at {}x failed: {}", scale, e);
                    failed_scales.push(scale);
                    continue;
                }
            };

            match self.queue.submit(raster, self.options.clone()).await {
                Ok(text) => {
                    let stats = self.extractor.extract(&text.text);
                    debug!("Scale {}x: {} stats", scale, stats.len());
                    per_scale.push(MultiScaleOcrResult {
                        scale,
                        stats,
                        raw_text: text.text,
                    });
                }
                Err(e) => {
                    warn!("Recognition at {}x failed: {}", scale, e);
                    failed_scales.push(scale);
                }
            }
        }

        if per_scale.is_empty() {
            return Err(OcrError::AllScalesFailed {
                category: category.id().to_string(),
            }
            .into());
        }

        let merged = merge_by_majority(&per_scale);
        let stats = fill_missing_stats(&merged, category);

        let raw_text = per_scale
            .iter()
            .find(|r| r.scale == 2)
            .or_else(|| per_scale.first())
            .map(|r| r.raw_text.clone())
            .unwrap_or_default();

        let result = ScanResult {
            category,
            stats,
            raw_text,
            per_scale,
            failed_scales,
        };
        info!(
            "Recognized {}/{} {} stats",
            result.recognized_count(),
            result.stats.len(),
            category
        );

        Ok(result)
    }
}
