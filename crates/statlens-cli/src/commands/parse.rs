//! Parse command - extract stats from text without running OCR.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

use statlens_core::{fill_missing_stats, StatCategory, StatExtractor};

use super::{format_stats, load_config, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file with OCR output, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Complete the result against this category's expected stats
    #[arg(short = 'C', long)]
    category: Option<StatCategory>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&args.input)?
    };

    let extractor = StatExtractor::from_config(&config.extraction);
    let mut stats = extractor.extract(&text);
    if let Some(category) = args.category {
        stats = fill_missing_stats(&stats, category);
    }

    let output = format_stats(&stats, args.format)?;
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

    Ok(())
}
