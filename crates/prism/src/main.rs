//! Prism CLI - Multi-label image tagging for imageboard-style vocabularies.
//!
//! Prism takes images as input and outputs tag strings and per-category
//! confidence maps from a pre-trained ONNX tagger model.
//!
//! # Usage
//!
//! ```bash
//! # Tag a single image
//! prism tag image.png
//!
//! # Tag a directory with adaptive thresholding, JSONL output
//! prism tag ./art/ --general-mcut --format jsonl --output tags.jsonl
//!
//! # Manage models
//! prism models download swinv2-v3
//!
//! # View configuration
//! prism config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Prism - multi-label image tagger.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag images and print or write the results
    Tag(cli::tag::TagArgs),

    /// Manage tagger models (download, list, etc.)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go to eprintln.
    let config = match prism_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `prism config path`."
            );
            prism_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Prism v{}", prism_core::VERSION);

    match cli.command {
        Commands::Tag(args) => cli::tag::execute(args, config).await,
        Commands::Models(args) => cli::models::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
