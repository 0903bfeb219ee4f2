//! Preprocess command - write the raster the OCR engine would see.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use statlens_core::models::config::{AdaptiveThreshold, Morphology};
use statlens_core::{ImagePreprocessor, RelativeRect};

use super::load_config;

/// Arguments for the preprocess command.
#[derive(Args)]
pub struct PreprocessArgs {
    /// Input screenshot
    #[arg(required = true)]
    input: PathBuf,

    /// Output image (PNG)
    #[arg(short, long, required = true)]
    output: PathBuf,

    /// Scale factor
    #[arg(short, long, default_value = "2")]
    scale: u32,

    /// Contrast factor
    #[arg(long)]
    contrast: Option<f32>,

    /// Brightness offset (0-255 scale)
    #[arg(long)]
    brightness: Option<f32>,

    /// Global binarization threshold
    #[arg(long)]
    threshold: Option<u8>,

    /// Adaptive threshold window size
    #[arg(long)]
    adaptive: Option<u32>,

    /// Constant subtracted from the adaptive local mean
    #[arg(long, default_value = "5")]
    adaptive_c: i32,

    /// Invert before thresholding
    #[arg(long)]
    invert: bool,

    /// Morphological operator
    #[arg(long, value_enum)]
    morphology: Option<MorphologyArg>,

    /// Morphology kernel radius
    #[arg(long, default_value = "1")]
    radius: u32,

    /// Relative crop region "x,y,width,height" (0.0 - 1.0)
    #[arg(long, value_delimiter = ',', num_args = 4)]
    crop: Option<Vec<f32>>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum MorphologyArg {
    Erode,
    Dilate,
    Open,
    Close,
}

impl From<MorphologyArg> for Morphology {
    fn from(arg: MorphologyArg) -> Self {
        match arg {
            MorphologyArg::Erode => Morphology::Erode,
            MorphologyArg::Dilate => Morphology::Dilate,
            MorphologyArg::Open => Morphology::Open,
            MorphologyArg::Close => Morphology::Close,
        }
    }
}

pub fn run(args: PreprocessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?.preprocess;

    if let Some(contrast) = args.contrast {
        config.contrast = contrast;
    }
    if let Some(brightness) = args.brightness {
        config.brightness = brightness;
    }
    if let Some(threshold) = args.threshold {
        config.filters.threshold = Some(threshold);
    }
    if let Some(window) = args.adaptive {
        config.filters.adaptive = Some(AdaptiveThreshold {
            window,
            constant: args.adaptive_c,
        });
    }
    if args.invert {
        config.filters.invert = true;
    }
    if let Some(morphology) = args.morphology {
        config.filters.morphology = morphology.into();
        config.filters.morphology_radius = args.radius;
    }

    let mut preprocessor = ImagePreprocessor::from_config(&config);
    if let Some(crop) = &args.crop {
        let [x, y, width, height] = crop.as_slice() else {
            anyhow::bail!("--crop expects four values");
        };
        preprocessor = preprocessor.with_region(RelativeRect {
            x: *x,
            y: *y,
            width: *width,
            height: *height,
        });
    }

    let bytes = fs::read(&args.input)?;
    let raster = preprocessor.preprocess_bytes(&bytes, args.scale)?;
    info!("Preprocessed raster: {}x{}", raster.width(), raster.height());

    raster.save(&args.output)?;
    println!(
        "{} Wrote {}x{} raster to {}",
        style("✓").green(),
        raster.width(),
        raster.height(),
        args.output.display()
    );

    Ok(())
}
