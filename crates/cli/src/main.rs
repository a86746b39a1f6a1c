//! patternlab CLI: run and compare agent patterns.
//!
//! Commands:
//! - `ask`     Run one query through one or all patterns
//! - `bench`   Run the test corpus through every enabled pattern
//! - `corpus`  Write the built-in test corpus
//! - `config`  Show, locate or validate configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "patternlab",
    about = "patternlab: compare Chain of Thought, ReAct and Plan-and-Execute agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single query
    Ask {
        /// The query to answer
        query: String,

        /// Pattern to use: cot, react, plan_execute or all
        #[arg(short, long, default_value = "all")]
        pattern: String,

        /// Use the offline mock provider
        #[arg(long)]
        mock: bool,

        /// Config file (defaults to ~/.patternlab/config.toml)
        #[arg(short, long, env = "PATTERNLAB_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Compare patterns over the test corpus
    Bench {
        /// Only run cases from this category
        #[arg(long)]
        category: Option<String>,

        /// Use the offline mock provider
        #[arg(long)]
        mock: bool,

        /// Config file (defaults to ~/.patternlab/config.toml)
        #[arg(short, long, env = "PATTERNLAB_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write the built-in test corpus
    Corpus {
        /// Output directory
        #[arg(short, long, default_value = "data/test_cases")]
        output: PathBuf,
    },

    /// Configuration helpers (prints the default config without a subcommand)
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        #[arg(short, long, env = "PATTERNLAB_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print the default config file location
    Path,
    /// Load and validate the configuration
    Validate {
        #[arg(short, long, env = "PATTERNLAB_CONFIG")]
        config: Option<PathBuf>,

        /// Also check that the provider endpoint answers
        #[arg(long)]
        ping: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ask {
            query,
            pattern,
            mock,
            config,
        } => commands::ask::run(&query, &pattern, mock, config).await?,
        Commands::Bench {
            category,
            mock,
            config,
        } => commands::bench::run(category, mock, config).await?,
        Commands::Corpus { output } => commands::corpus::run(&output).await?,
        Commands::Config { action } => match action {
            None => commands::config_cmd::default().await?,
            Some(ConfigAction::Show { config }) => commands::config_cmd::show(config).await?,
            Some(ConfigAction::Path) => commands::config_cmd::path().await?,
            Some(ConfigAction::Validate { config, ping }) => {
                commands::config_cmd::validate(config, ping).await?
            }
        },
    }

    Ok(())
}
