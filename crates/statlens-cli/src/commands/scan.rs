//! Scan command - recognize stats in screenshots of one category.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use statlens_core::{ScanResult, StatCategory, StatPipeline};

use super::{format_stats, load_config, OutputFormat};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Screenshot file or glob pattern
    #[arg(required = true)]
    input: String,

    /// Stat category shown in the screenshot (basic, combat, pvp-pve, special)
    #[arg(short = 'C', long)]
    category: StatCategory,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Override the scale factors (comma separated)
    #[arg(long, value_delimiter = ',')]
    scales: Option<Vec<u32>>,

    /// Include raw text and per-scale results
    #[arg(long)]
    show_scales: bool,

    /// Continue with the next file on error
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    if let Some(scales) = &args.scales {
        config.reconcile.scales = scales.clone();
    }

    let files = expand_input(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No screenshots match {}", args.input);
    }
    info!("Scanning {} file(s) as {}", files.len(), args.category);

    let pipeline = StatPipeline::with_tesseract(&config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut results: Vec<(PathBuf, ScanResult)> = Vec::new();
    for path in &files {
        pb.set_message(path.display().to_string());

        let outcome = match fs::read(path) {
            Ok(bytes) => pipeline.scan(&bytes, args.category).await.map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(result) => results.push((path.clone(), result)),
            Err(e) if args.continue_on_error => {
                error!("Failed to scan {}: {}", path.display(), e);
            }
            Err(e) => {
                pb.abandon();
                return Err(e.context(format!("failed to scan {}", path.display())));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let output = render(&results, &args)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn expand_input(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = PathBuf::from(input);
    if path.exists() {
        return Ok(vec![path]);
    }

    Ok(glob(input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "bmp" | "webp" | "gif" | "tiff"
            )
        })
        .collect())
}

fn render(results: &[(PathBuf, ScanResult)], args: &ScanArgs) -> anyhow::Result<String> {
    if let OutputFormat::Json = args.format {
        let values: Vec<serde_json::Value> = results
            .iter()
            .map(|(path, result)| {
                if args.show_scales {
                    serde_json::json!({ "file": path, "result": result })
                } else {
                    serde_json::json!({ "file": path, "stats": result.stats })
                }
            })
            .collect();
        return Ok(match values.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            _ => serde_json::to_string_pretty(&values)?,
        });
    }

    let mut output = String::new();
    for (path, result) in results {
        if results.len() > 1 {
            output.push_str(&format!("# {}\n", path.display()));
        }
        output.push_str(&format_stats(&result.stats, args.format)?);

        if args.show_scales {
            for scale in &result.per_scale {
                output.push_str(&format!(
                    "\n[{}x] {} stats\n{}\n",
                    scale.scale,
                    scale.stats.len(),
                    scale.raw_text
                ));
            }
            if !result.failed_scales.is_empty() {
                output.push_str(&format!("\nFailed scales: {:?}\n", result.failed_scales));
            }
        }
    }

    Ok(output)
}
