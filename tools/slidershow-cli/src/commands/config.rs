//! Show or initialize the configuration file.

use std::path::Path;

use slidershow_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool, force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if init {
        init_config(&path, force)?;
        println!("Written: {}", path.display());
        return Ok(());
    }

    println!("Config: {}", path.display());
    if !path.exists() {
        println!("  (not present, showing defaults; create it with --init)");
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Write the default configuration to `path`.
fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists; pass --force to overwrite",
            path.display()
        ));
    }
    AppConfig::default()
        .save_to(path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))
}
