//! `cbam-assistant config` — print the effective configuration.

use cbam_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("# Effective configuration");
    println!("# File: {}", AppConfig::config_dir().join("config.toml").display());
    println!(
        "# API key: {}",
        if config.has_api_key() { "set" } else { "not set" }
    );
    println!();

    // Keys never appear in the serialized output.
    let mut printable = config.clone();
    printable.api_key = None;
    printable.search.api_key = None;
    printable.completion.api_key = None;
    println!("{}", toml::to_string_pretty(&printable)?);

    Ok(())
}
