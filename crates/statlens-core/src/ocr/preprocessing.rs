//! Image preprocessing for OCR.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::{FilterConfig, PreprocessConfig};

use super::filters;

/// Region of interest in relative coordinates (0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RelativeRect {
    /// Pixel rectangle `(x, y, width, height)` within a `width x height` image.
    ///
    /// Clamped to the image bounds and never smaller than one pixel.
    pub fn to_pixels(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let x0 = ((self.x.clamp(0.0, 1.0) * width as f32) as u32).min(width.saturating_sub(1));
        let y0 = ((self.y.clamp(0.0, 1.0) * height as f32) as u32).min(height.saturating_sub(1));
        let w = (self.width.max(0.0) * width as f32).round() as u32;
        let h = (self.height.max(0.0) * height as f32).round() as u32;

        let w = w.min(width - x0).max(1);
        let h = h.min(height - y0).max(1);
        (x0, y0, w, h)
    }
}

/// Image preprocessor for the recognition pipeline.
///
/// Upscales, converts to grayscale and stretches contrast for light text on
/// a dark background. Holds no mutable state: the same input always yields
/// the same raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreprocessor {
    /// Linear contrast factor around mid-gray.
    contrast: f32,
    /// Offset added after contrast, 0-255 scale.
    brightness: f32,
    /// Optional tuning filters.
    filters: FilterConfig,
    /// Optional crop applied before scaling.
    region: Option<RelativeRect>,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self::from_config(&PreprocessConfig::default())
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &PreprocessConfig) -> Self {
        Self {
            contrast: config.contrast,
            brightness: config.brightness,
            filters: config.filters.clone(),
            region: None,
        }
    }

    /// Set the contrast factor.
    pub fn with_contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    /// Set the brightness offset.
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    /// Set the tuning filters.
    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }

    /// Crop to a region of interest before scaling.
    pub fn with_region(mut self, region: RelativeRect) -> Self {
        self.region = Some(region);
        self
    }

    /// Decode encoded image bytes.
    ///
    /// A decode failure and a zero-sized raster are reported separately.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, OcrError> {
        let image = image::load_from_memory(bytes).map_err(|e| OcrError::Decode(e.to_string()))?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::EmptyImage);
        }
        debug!("Decoded image: {}x{}", width, height);
        Ok(image)
    }

    /// Decode and preprocess in one step.
    pub fn preprocess_bytes(&self, bytes: &[u8], scale: u32) -> Result<GrayImage, OcrError> {
        let image = self.decode(bytes)?;
        self.preprocess(&image, scale)
    }

    /// Produce a `scale`x upscaled, grayscale, contrast-enhanced raster.
    pub fn preprocess(&self, image: &DynamicImage, scale: u32) -> Result<GrayImage, OcrError> {
        if scale == 0 {
            return Err(OcrError::InvalidScale(scale));
        }

        let (orig_width, orig_height) = image.dimensions();
        if orig_width == 0 || orig_height == 0 {
            return Err(OcrError::EmptyImage);
        }

        let source = match self.region {
            Some(region) => {
                let (x, y, w, h) = region.to_pixels(orig_width, orig_height);
                image.crop_imm(x, y, w, h)
            }
            None => image.clone(),
        };

        let (width, height) = source.dimensions();
        let target_width = width.saturating_mul(scale);
        let target_height = height.saturating_mul(scale);

        let resized = if scale == 1 {
            source
        } else {
            source.resize_exact(
                target_width,
                target_height,
                image::imageops::FilterType::Lanczos3,
            )
        };
        debug!("Preprocessing at {}x: {}x{}", scale, target_width, target_height);

        let enhanced = self.enhance(&resized);
        Ok(filters::apply(&enhanced, &self.filters))
    }

    /// Grayscale conversion plus contrast and brightness.
    fn enhance(&self, image: &DynamicImage) -> GrayImage {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut gray = GrayImage::new(width, height);

        for (x, y, pixel) in rgb.enumerate_pixels() {
            let luma = 0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
            gray.put_pixel(x, y, Luma([self.adjust(luma)]));
        }

        gray
    }

    fn adjust(&self, value: f32) -> u8 {
        let stretched = ((value / 255.0 - 0.5) * self.contrast + 0.5) * 255.0 + self.brightness;
        stretched.clamp(0.0, 255.0).round() as u8
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 20 % 256) as u8, (y * 30 % 256) as u8, ((x + y) * 10 % 256) as u8])
        });
        DynamicImage::ImageRgb8(image)
    }

    fn encode_png(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_output_dimensions() {
        let preprocessor = ImagePreprocessor::new();
        let image = gradient(12, 7);

        for scale in 1..=4 {
            let out = preprocessor.preprocess(&image, scale).unwrap();
            assert_eq!(out.dimensions(), (12 * scale, 7 * scale));
        }
    }

    #[test]
    fn test_preprocessing_is_deterministic() {
        let preprocessor = ImagePreprocessor::new();
        let bytes = encode_png(&gradient(10, 10));

        let first = preprocessor.preprocess_bytes(&bytes, 3).unwrap();
        let second = preprocessor.preprocess_bytes(&bytes, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_contrast_formula() {
        let preprocessor = ImagePreprocessor::new();
        // Mid-gray stays near mid-gray, shifted by brightness
        assert_eq!(preprocessor.adjust(127.5), 138);
        assert_eq!(preprocessor.adjust(0.0), 0);
        assert_eq!(preprocessor.adjust(255.0), 255);

        let flat = ImagePreprocessor::new().with_contrast(1.0).with_brightness(0.0);
        assert_eq!(flat.adjust(100.0), 100);
    }

    #[test]
    fn test_luma_weights() {
        let flat = ImagePreprocessor::new().with_contrast(1.0).with_brightness(0.0);
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 0, 0])));

        let out = flat.preprocess(&red, 1).unwrap();
        assert_eq!(out.get_pixel(0, 0)[0], 76);
    }

    #[test]
    fn test_decode_failure_is_distinct() {
        let preprocessor = ImagePreprocessor::new();
        let err = preprocessor.preprocess_bytes(b"not an image", 1).unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let preprocessor = ImagePreprocessor::new();
        let err = preprocessor.preprocess(&gradient(2, 2), 0).unwrap_err();
        assert_eq!(err, OcrError::InvalidScale(0));
    }

    #[test]
    fn test_region_crop_before_scaling() {
        let preprocessor = ImagePreprocessor::new().with_region(RelativeRect {
            x: 0.5,
            y: 0.0,
            width: 0.5,
            height: 0.5,
        });

        let out = preprocessor.preprocess(&gradient(20, 10), 2).unwrap();
        assert_eq!(out.dimensions(), (20, 10));
    }

    #[test]
    fn test_region_clamped_to_bounds() {
        let rect = RelativeRect { x: 0.9, y: 0.9, width: 0.5, height: 0.5 };
        assert_eq!(rect.to_pixels(10, 10), (9, 9, 1, 1));
    }
}
