//! Optional raster post-filters for manual tuning.
//!
//! Each filter is a pure grayscale-to-grayscale transform. None of them is
//! part of the default pipeline.

use image::{GrayImage, Luma};
use ndarray::Array2;

use crate::models::config::{FilterConfig, Morphology};

/// Apply the configured filters in order: invert, threshold, morphology.
///
/// Inverting first turns light UI text dark before binarization.
pub fn apply(image: &GrayImage, config: &FilterConfig) -> GrayImage {
    let source = if config.invert {
        invert(image)
    } else {
        image.clone()
    };

    let out = match (config.adaptive, config.threshold) {
        (Some(adaptive), _) => adaptive_threshold(&source, adaptive.window, adaptive.constant),
        (None, Some(t)) => threshold(&source, t),
        (None, None) => source,
    };

    morphology(&out, config.morphology, config.morphology_radius)
}

/// Global binarization: values above `t` become white, the rest black.
pub fn threshold(image: &GrayImage, t: u8) -> GrayImage {
    map_pixels(image, |v| if v > t { 255 } else { 0 })
}

/// Invert every pixel.
pub fn invert(image: &GrayImage) -> GrayImage {
    map_pixels(image, |v| 255 - v)
}

/// Local-mean binarization.
///
/// The mean is taken over a square `window` wide, clamped to the image,
/// using an integral image. A pixel darker than `mean - c` becomes black.
pub fn adaptive_threshold(image: &GrayImage, window: u32, c: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let integral = integral_image(image);
    let half = window / 2;

    let mut result = GrayImage::new(width, height);

    for y in 0..height {
        let y0 = y.saturating_sub(half) as usize;
        let y1 = (y + half + 1).min(height) as usize;
        for x in 0..width {
            let x0 = x.saturating_sub(half) as usize;
            let x1 = (x + half + 1).min(width) as usize;

            let sum = integral[[y1, x1]] + integral[[y0, x0]]
                - integral[[y0, x1]]
                - integral[[y1, x0]];
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            let mean = (sum / count) as i32;

            let value = image.get_pixel(x, y)[0] as i32;
            let output = if value < mean - c { 0 } else { 255 };
            result.put_pixel(x, y, Luma([output]));
        }
    }

    result
}

/// Apply a morphological operator with a square kernel of `radius`.
pub fn morphology(image: &GrayImage, op: Morphology, radius: u32) -> GrayImage {
    if radius == 0 {
        return image.clone();
    }
    match op {
        Morphology::None => image.clone(),
        Morphology::Erode => erode(image, radius),
        Morphology::Dilate => dilate(image, radius),
        Morphology::Open => dilate(&erode(image, radius), radius),
        Morphology::Close => erode(&dilate(image, radius), radius),
    }
}

/// Local minimum over a `(2r+1)` square.
pub fn erode(image: &GrayImage, radius: u32) -> GrayImage {
    square_filter(image, radius, u8::min)
}

/// Local maximum over a `(2r+1)` square.
pub fn dilate(image: &GrayImage, radius: u32) -> GrayImage {
    square_filter(image, radius, u8::max)
}

fn map_pixels(image: &GrayImage, f: impl Fn(u8) -> u8) -> GrayImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel[0] = f(pixel[0]);
    }
    out
}

/// Summed-area table with a zero row and column in front.
fn integral_image(image: &GrayImage) -> Array2<u64> {
    let (width, height) = image.dimensions();
    let mut table = Array2::<u64>::zeros((height as usize + 1, width as usize + 1));

    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += image.get_pixel(x as u32, y as u32)[0] as u64;
            table[[y + 1, x + 1]] = table[[y, x + 1]] + row_sum;
        }
    }

    table
}

/// Separable square-kernel filter: horizontal pass, then vertical.
fn square_filter(image: &GrayImage, radius: u32, pick: fn(u8, u8) -> u8) -> GrayImage {
    let (width, height) = image.dimensions();

    let mut horizontal = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(width - 1);
            let value = (x0..=x1)
                .map(|lx| image.get_pixel(lx, y)[0])
                .reduce(pick)
                .unwrap_or(0);
            horizontal.put_pixel(x, y, Luma([value]));
        }
    }

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(height - 1);
        for x in 0..width {
            let value = (y0..=y1)
                .map(|ly| horizontal.get_pixel(x, ly)[0])
                .reduce(pick)
                .unwrap_or(0);
            out.put_pixel(x, y, Luma([value]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::AdaptiveThreshold;

    fn single_dot(size: u32, value: u8) -> GrayImage {
        let mut image = GrayImage::from_pixel(size, size, Luma([255 - value]));
        image.put_pixel(size / 2, size / 2, Luma([value]));
        image
    }

    #[test]
    fn test_threshold_and_invert() {
        let image = GrayImage::from_raw(3, 1, vec![10, 128, 200]).unwrap();
        assert_eq!(threshold(&image, 128).into_raw(), vec![0, 0, 255]);
        assert_eq!(invert(&image).into_raw(), vec![245, 127, 55]);
    }

    #[test]
    fn test_dilate_grows_bright_dot() {
        let image = single_dot(5, 255);
        let dilated = dilate(&image, 1);

        let white = dilated.pixels().filter(|p| p[0] == 255).count();
        assert_eq!(white, 9);
        assert_eq!(dilated.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_open_removes_speck() {
        let image = single_dot(7, 255);
        let opened = morphology(&image, Morphology::Open, 1);
        assert!(opened.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_close_fills_hole() {
        let image = single_dot(7, 0);
        let closed = morphology(&image, Morphology::Close, 1);
        assert!(closed.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_adaptive_threshold_marks_dark_text() {
        // Dark stroke on a bright background
        let mut image = GrayImage::from_pixel(9, 9, Luma([200]));
        for x in 2..7 {
            image.put_pixel(x, 4, Luma([40]));
        }

        let binary = adaptive_threshold(&image, 5, 5);
        assert_eq!(binary.get_pixel(4, 4)[0], 0);
        assert_eq!(binary.get_pixel(0, 0)[0], 255);
        assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_apply_prefers_adaptive() {
        let image = GrayImage::from_pixel(4, 4, Luma([100]));
        let config = FilterConfig {
            threshold: Some(50),
            adaptive: Some(AdaptiveThreshold::default()),
            ..FilterConfig::default()
        };

        // Uniform image: no pixel is darker than its local mean
        let out = apply(&image, &config);
        assert!(out.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_apply_inverts_before_threshold() {
        let image = GrayImage::from_raw(3, 1, vec![100, 50, 230]).unwrap();
        let config = FilterConfig {
            threshold: Some(160),
            invert: true,
            ..FilterConfig::default()
        };

        // 100 -> 155 (not above 160), 50 -> 205, 230 -> 25
        assert_eq!(apply(&image, &config).into_raw(), vec![0, 255, 0]);
    }

    #[test]
    fn test_apply_inverted_adaptive_marks_light_text() {
        // Light stroke on a dark background, as on the game UI
        let mut image = GrayImage::from_pixel(9, 9, Luma([40]));
        for x in 2..7 {
            image.put_pixel(x, 4, Luma([220]));
        }
        let config = FilterConfig {
            adaptive: Some(AdaptiveThreshold { window: 5, constant: 5 }),
            invert: true,
            ..FilterConfig::default()
        };

        let out = apply(&image, &config);
        assert_eq!(out.get_pixel(4, 4)[0], 0);
        assert_eq!(out.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_default_filters_are_identity() {
        let image = GrayImage::from_raw(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(apply(&image, &FilterConfig::default()), image);
    }
}
