//! feed-relay - Norwegian product feed generator
//!
//! Fetches a product feed, converts it for the Norwegian store and writes it to disk.

use anyhow::Result;
use clap::{Parser, Subcommand};
use feed_relay::commands::{ConvertCommand, RunCommand};
use feed_relay::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "feed-relay",
    version,
    about = "Norwegian product feed generator",
    long_about = "Fetches a Google Merchant product feed, keeps the Norwegian items, converts prices to NOK and writes the result atomically."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output file for the transformed feed
    #[arg(short, long, global = true, env = "FEED_OUTPUT")]
    output: Option<PathBuf>,

    /// Category keyword an item must contain
    #[arg(short, long, global = true, env = "FEED_KEYWORD")]
    keyword: Option<String>,

    /// Summary format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the source feed, transform it and write the output
    #[command(alias = "r")]
    Run {
        /// Source feed URL
        #[arg(long, env = "FEED_SOURCE_URL")]
        url: Option<String>,

        /// Number of fetch attempts
        #[arg(long)]
        attempts: Option<u32>,

        /// Delay between fetch attempts in milliseconds
        #[arg(long)]
        delay: Option<u64>,

        /// Commit and push the output file with git
        #[arg(long)]
        publish: bool,

        /// Branch to push to
        #[arg(long)]
        branch: Option<String>,
    },

    /// Transform a local feed file without fetching or publishing
    #[command(alias = "c")]
    Convert {
        /// Source feed file
        input: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(keyword) = cli.keyword {
        config.keyword = keyword;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Run { url, attempts, delay, publish, branch } => {
            if let Some(url) = url {
                config.source_url = url;
            }
            if let Some(attempts) = attempts {
                config.fetch_attempts = attempts;
            }
            if let Some(delay) = delay {
                config.fetch_delay_ms = delay;
            }
            if publish {
                config.publish = true;
            }
            if branch.is_some() {
                config.git_branch = branch;
            }
            config.validate()?;

            let output = RunCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Convert { input } => {
            config.validate()?;

            let output = ConvertCommand::new(config).execute(&input).await?;
            println!("{}", output);
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
