//! Text recognition engine abstraction.

use std::future::Future;

use image::GrayImage;

use crate::error::OcrError;

use super::{RecognitionOptions, RecognizedText};

/// An OCR engine instance.
///
/// Engines are stateful and not safe for concurrent use, so recognition takes
/// `&mut self`. In the pipeline an engine is owned by the worker of a
/// [`RecognitionQueue`](super::RecognitionQueue), which is the only caller.
pub trait TextRecognizer {
    /// Human-readable engine name for logs.
    fn name(&self) -> &str;

    /// Recognize text in a preprocessed raster.
    fn recognize(
        &mut self,
        image: &GrayImage,
        options: &RecognitionOptions,
    ) -> impl Future<Output = Result<RecognizedText, OcrError>> + Send;
}
