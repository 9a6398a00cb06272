//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use wikipress_core::Config;

const DEFAULT_CONFIG: &str = include_str!("../../../wikipress.yml.example");

/// Initialize a new wikipress project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_vault(root)?;

    println!("✓ wikipress initialized in {:?}", root);
    println!("  - Edit wikipress.yml to point at your vault");
    println!("  - Run `wikipress build` to write the content tree");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("wikipress.yml");
    if config_path.exists() {
        println!("wikipress.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

/// Create the posts and drafts directories the default config expects
fn scaffold_vault(root: &Path) -> Result<()> {
    let config = Config::from_file(root.join("wikipress.yml"))
        .context("Failed to read wikipress.yml")?;
    let drafts = config.drafts_dir();

    fs::create_dir_all(&drafts).with_context(|| format!("Failed to create {:?}", drafts))?;
    Ok(())
}
