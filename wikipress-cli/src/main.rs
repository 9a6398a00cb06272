//! # wikipress CLI
//!
//! Command-line interface for converting an Obsidian vault into site content.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wikipress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(long, default_value = "wikipress.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new wikipress project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Convert the vault into a content tree
    Build {
        /// Vault directory (overrides paths.vault)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Output directory (overrides paths.output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build { path, output, json } => {
            let opts = commands::BuildOptions { path, output, json };
            commands::build_site(&cli.config, opts)
        }
    }
}
