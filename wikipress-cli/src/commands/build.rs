//! Build command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wikipress_core::{BuildReport, Config, SiteBuilder};

/// Command-line overrides for a build
pub struct BuildOptions {
    pub path: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub json: bool,
}

/// Convert the vault described by the config (and overrides)
pub fn build_site(config_path: &Path, opts: BuildOptions) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let mut config =
        Config::from_file_or_default(config_path).context("Failed to load configuration")?;

    // Overrides are relative to the working directory, not the config file
    if let Some(vault) = &opts.path {
        config.paths.vault = std::path::absolute(vault)
            .with_context(|| format!("Invalid vault path {:?}", vault))?;
    }
    if let Some(output) = &opts.output {
        config.paths.output = std::path::absolute(output)
            .with_context(|| format!("Invalid output path {:?}", output))?;
    }

    let output_dir = config.output_dir();
    let report = SiteBuilder::new(config)
        .build()
        .context("Failed to build site")?;

    if opts.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize build report")?;
        println!("{json}");
    } else {
        print_summary(&report, &output_dir);
    }

    Ok(())
}

fn print_summary(report: &BuildReport, output_dir: &Path) {
    println!(
        "✓ Converted {} posts, {} drafts, {} series members, {} series indexes",
        report.posts, report.drafts, report.series_members, report.series_indexes
    );
    println!(
        "✓ Copied {} images, built {} search pages",
        report.images, report.search_pages
    );
    for skipped in &report.skipped {
        println!("  skipped {:?}: {}", skipped.path, skipped.reason);
    }
    println!("✓ Output written to {:?}", output_dir);
}
