//! Impostor server - real-time rooms for the word impostor party game.

use anyhow::Result;
use clap::Parser;
use impostor_server::{app, config, logging, state};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use logging::{LogConfig, LogFormat};
use state::AppState;

/// Impostor server - party game room coordinator.
#[derive(Parser, Debug)]
#[command(name = "impostor-server")]
#[command(about = "HTTP/WebSocket server for the word impostor party game")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the word corpus path
    #[arg(short, long, value_name = "FILE")]
    words: Option<PathBuf>,

    /// Seed for reproducible tie-breaks and word dealing
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Enable verbose logging (INFO level for all targets)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (TRACE level for everything)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "vote=debug" or "transport=trace").
    /// Can be specified multiple times. Targets are prefixed with "impostor::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(words) = cli.words {
        config.words_path = words;
    }
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }

    tracing::info!(
        target: "impostor::startup",
        "Loaded configuration (port: {}, words: {:?}, seeded: {})",
        config.port,
        config.words_path,
        config.rng_seed.is_some()
    );

    let state = Arc::new(AppState::new(config.clone())?);
    tracing::info!(
        target: "impostor::startup",
        "Offering {} categories",
        state.coordinator.categories().len()
    );

    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(target: "impostor::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
