//! Catalog command - list categories, expected stats and known aliases.

use clap::Args;
use console::style;

use statlens_core::stats::catalog;
use statlens_core::StatCategory;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Only this category
    #[arg(short = 'C', long)]
    category: Option<StatCategory>,

    /// Show registered OCR misreadings
    #[arg(long)]
    aliases: bool,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CatalogArgs) -> anyhow::Result<()> {
    let categories: Vec<StatCategory> = match args.category {
        Some(category) => vec![category],
        None => StatCategory::ALL.to_vec(),
    };

    if args.json {
        let value: Vec<serde_json::Value> = categories
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id(),
                    "label": c.label(),
                    "description": c.description(),
                    "stats": c.expected_stats(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for category in categories {
        println!(
            "{} {} ({})",
            style(category.label()).bold(),
            style(category.id()).dim(),
            category.description()
        );
        for name in category.expected_stats() {
            let aliases = catalog::aliases(name);
            if args.aliases && !aliases.is_empty() {
                println!("  {}  {}", name, style(aliases.join(", ")).dim());
            } else {
                println!("  {}", name);
            }
        }
        println!();
    }

    Ok(())
}
