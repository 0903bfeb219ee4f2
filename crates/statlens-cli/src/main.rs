//! CLI application for game stat panel OCR.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{catalog, config, engine, parse, preprocess, scan, sheet};

/// Stat panel OCR - Read character stats from game screenshots
#[derive(Parser)]
#[command(name = "statlens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan screenshots of one stat category
    Scan(scan::ScanArgs),

    /// Scan several categories into a stat sheet snapshot
    Sheet(sheet::SheetArgs),

    /// Extract stats from already recognized text
    Parse(parse::ParseArgs),

    /// Write the preprocessed raster for inspection
    Preprocess(preprocess::PreprocessArgs),

    /// List categories and their expected stats
    Catalog(catalog::CatalogArgs),

    /// Show OCR engine information
    Engine,

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Scan(args) => scan::run(args, config_path).await,
        Commands::Sheet(args) => sheet::run(args, config_path).await,
        Commands::Parse(args) => parse::run(args, config_path),
        Commands::Preprocess(args) => preprocess::run(args, config_path),
        Commands::Catalog(args) => catalog::run(args),
        Commands::Engine => engine::run(config_path).await,
        Commands::Config(args) => config::run(args),
    }
}
