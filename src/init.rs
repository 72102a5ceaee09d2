use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

const STARTER_CONFIG: &str = include_str!("../presets/header-auditor.toml");

pub fn generate_config() -> Result<()> {
    generate_config_at_path(CONFIG_FILE)
}

pub fn generate_config_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let config_path = path.as_ref();

    if config_path.exists() {
        return Err(anyhow::anyhow!(
            "{} already exists. Remove it first to regenerate.",
            config_path.display()
        ));
    }

    fs::write(config_path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    log::info!("Wrote starter configuration to {}", config_path.display());

    Ok(())
}
