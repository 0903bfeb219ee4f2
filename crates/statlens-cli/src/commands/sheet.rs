//! Sheet command - scan every category of a character into one snapshot.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use statlens_core::{
    compare, ScanSession, StatCategory, StatPipeline, StatSheet, StatSnapshot, Trend,
};

use super::load_config;

/// Arguments for the sheet command.
#[derive(Args)]
pub struct SheetArgs {
    /// Screenshot of the basic stats panel
    #[arg(long)]
    basic: Option<PathBuf>,

    /// Screenshot of the combat/judgement panel
    #[arg(long)]
    combat: Option<PathBuf>,

    /// Screenshot of the PVP/PVE panel
    #[arg(long)]
    pvp_pve: Option<PathBuf>,

    /// Screenshot of the special/resource panel
    #[arg(long)]
    special: Option<PathBuf>,

    /// Start from a saved snapshot instead of an empty sheet
    #[arg(long)]
    from: Option<PathBuf>,

    /// Manual correction, e.g. --set "공격력=1234" (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    corrections: Vec<String>,

    /// Previous snapshot to compare against
    #[arg(long)]
    previous: Option<PathBuf>,

    /// Write the snapshot to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: SheetArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let sheet = match &args.from {
        Some(path) => StatSheet::from_snapshot(&StatSnapshot::from_file(path)?),
        None => StatSheet::new(),
    };
    let mut session = ScanSession::with_sheet(StatPipeline::with_tesseract(&config), sheet);

    let inputs = [
        (StatCategory::Basic, &args.basic),
        (StatCategory::Combat, &args.combat),
        (StatCategory::PvpPve, &args.pvp_pve),
        (StatCategory::Special, &args.special),
    ];
    for (category, path) in inputs {
        if let Some(path) = path {
            session.enqueue(category, fs::read(path)?);
        }
    }

    if session.queue_len() == 0 && args.from.is_none() && args.corrections.is_empty() {
        anyhow::bail!("Nothing to do: pass at least one screenshot, --from or --set");
    }

    let pb = ProgressBar::new(session.queue_len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    while let Some((category, outcome)) = session.run_next().await {
        pb.set_message(category.label());
        match outcome {
            Ok(result) => pb.println(format!(
                "{} {}: {}/{} recognized",
                style("✓").green(),
                category.label(),
                result.recognized_count(),
                result.stats.len()
            )),
            Err(e) => pb.println(format!("{} {}: {}", style("✗").red(), category.label(), e)),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for correction in &args.corrections {
        apply_correction(session.sheet_mut(), correction)?;
    }

    let sheet = session.into_sheet();
    let snapshot = sheet.to_snapshot();

    if let Some(path) = &args.previous {
        let previous = StatSnapshot::from_file(path)?;
        println!(
            "Compared with snapshot from {}",
            previous.captured_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
        print_comparison(&snapshot, &previous);
    } else {
        for stat in &snapshot.stats {
            println!("{}: {}", stat.name, stat.value);
        }
    }

    println!();
    println!(
        "{} {} stats recognized in {} categories",
        style("ℹ").blue(),
        sheet.recognized_count(),
        sheet.completed_slots()
    );

    if let Some(output_path) = &args.output {
        snapshot.save(output_path)?;
        println!(
            "{} Snapshot written to {}",
            style("✓").green(),
            output_path.display()
        );
    }

    Ok(())
}

fn apply_correction(sheet: &mut StatSheet, correction: &str) -> anyhow::Result<()> {
    let (name, value) = correction
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected NAME=VALUE, got {}", correction))?;
    let name = name.trim();

    let category = StatCategory::category_of(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown stat: {}", name))?;
    sheet.edit(category, name, value)?;
    Ok(())
}

fn print_comparison(snapshot: &StatSnapshot, previous: &StatSnapshot) {
    for delta in compare(&snapshot.stats, previous) {
        let marker = match delta.trend {
            Trend::Up => style("▲").green(),
            Trend::Down => style("▼").red(),
            Trend::Same => style("=").dim(),
            Trend::New => style("+").cyan(),
        };
        if delta.previous.is_empty() {
            println!("{} {}: {}", marker, delta.name, delta.value);
        } else {
            println!("{} {}: {} (was {})", marker, delta.name, delta.value, delta.previous);
        }
    }

    let removed: Vec<&str> = previous
        .stats
        .iter()
        .filter(|p| !snapshot.stats.iter().any(|s| s.name == p.name))
        .map(|p| p.name.as_str())
        .collect();
    if !removed.is_empty() {
        warn!("Missing compared to previous snapshot: {}", removed.join(", "));
    }
}
