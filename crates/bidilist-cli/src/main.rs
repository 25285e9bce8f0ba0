use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bidilist_core::{AppConfig, SourceKind};

mod commands;

#[derive(Parser)]
#[command(name = "bidilist")]
#[command(author, version, about = "A terminal list that pages in both directions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/bidilist/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run {
        /// Page source: synthetic or http
        #[arg(long)]
        source: Option<String>,
        /// Endpoint for the http source
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Fetch a single page and print it
    Fetch {
        /// Page number, starting at 1
        #[arg(short = 'p', long, default_value_t = 1)]
        page: u32,
        /// Page source: synthetic or http
        #[arg(long)]
        source: Option<String>,
        /// Endpoint for the http source
        #[arg(long)]
        endpoint: Option<String>,
        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)?;

    match cli.command.unwrap_or(Commands::Run {
        source: None,
        endpoint: None,
    }) {
        Commands::Run { source, endpoint } => {
            apply_source_overrides(&mut config, source, endpoint)?;
            // The TUI owns the terminal, so logs go to a file
            init_file_logging(&config)?;
            commands::run::run(Arc::new(config)).await
        }
        Commands::Fetch {
            page,
            source,
            endpoint,
            json,
        } => {
            apply_source_overrides(&mut config, source, endpoint)?;
            init_stderr_logging(&config);
            commands::fetch::run(&config, page, json).await
        }
        Commands::Config { action } => {
            init_stderr_logging(&config);
            match action {
                ConfigAction::Show => commands::config::show(&config, &config_path),
                ConfigAction::Init { force } => commands::config::init(&config_path, force),
            }
        }
    }
}

fn apply_source_overrides(
    config: &mut AppConfig,
    source: Option<String>,
    endpoint: Option<String>,
) -> Result<()> {
    if let Some(source) = source {
        config.source.kind = source.parse::<SourceKind>()?;
    }
    if let Some(endpoint) = endpoint {
        config.source.endpoint = endpoint;
    }
    Ok(())
}

fn env_filter(config: &AppConfig) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    )
}

fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
