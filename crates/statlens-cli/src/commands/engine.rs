//! Engine command - report the OCR engine installation.

use console::style;

use statlens_core::TesseractCli;

use super::load_config;

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let engine = TesseractCli::from_config(&config.recognition);

    println!("Executable: {}", engine.executable().display());

    let version = match engine.engine_version().await {
        Ok(version) => version,
        Err(e) => {
            println!("Status: {}", style("not available").red());
            anyhow::bail!("{}", e);
        }
    };
    println!("Version: {}", version);

    let languages = engine.list_languages().await?;
    println!("Languages: {}", languages.join(", "));

    // Every language in the hint must be installed
    let missing: Vec<&str> = config
        .recognition
        .language
        .split('+')
        .filter(|lang| !languages.iter().any(|l| l == lang))
        .collect();

    if missing.is_empty() {
        println!(
            "Status: {} (lang={}, psm={})",
            style("ready").green(),
            config.recognition.language,
            config.recognition.page_segmentation.mode()
        );
    } else {
        println!(
            "Status: {} missing language data: {}",
            style("incomplete").yellow(),
            missing.join(", ")
        );
    }

    Ok(())
}
