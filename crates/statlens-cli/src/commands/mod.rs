//! Subcommands and the helpers they share.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod parse;
pub mod preprocess;
pub mod scan;
pub mod sheet;

use std::path::{Path, PathBuf};

use console::style;
use statlens_core::{RecognizedStat, StatLensConfig};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("statlens")
        .join("config.json")
}

/// Load `--config`, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StatLensConfig> {
    if let Some(path) = config_path {
        return Ok(StatLensConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(StatLensConfig::from_file(&default_path)?)
    } else {
        Ok(StatLensConfig::default())
    }
}

/// Output format for stat lists.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

/// Render a stat list.
pub fn format_stats(stats: &[RecognizedStat], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
        OutputFormat::Csv => format_csv(stats),
        OutputFormat::Text => Ok(format_text(stats)),
    }
}

fn format_csv(stats: &[RecognizedStat]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["name", "value", "is_percentage", "is_recognized"])?;
    for stat in stats {
        wtr.write_record([
            stat.name.as_str(),
            stat.value.as_str(),
            if stat.is_percentage { "true" } else { "false" },
            if stat.is_recognized { "true" } else { "false" },
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(stats: &[RecognizedStat]) -> String {
    let mut output = String::new();

    for stat in stats {
        if stat.is_recognized {
            output.push_str(&format!("{} {}: {}\n", style("✓").green(), stat.name, stat.value));
        } else {
            output.push_str(&format!("{} {}: -\n", style("?").yellow(), stat.name));
        }
    }

    let recognized = stats.iter().filter(|s| s.is_recognized).count();
    output.push_str(&format!("\n{}/{} recognized\n", recognized, stats.len()));
    output
}
