//! Dominoes - Unified CLI
//!
//! Runs the WebSocket game server or a hot-seat game in the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use dominoes::{ServerConfig, Terminal, validate_hand_size};
use dominoes_server::AppState;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Server {
            config,
            host,
            port,
            hand_size,
        } => run_server(config, host, port, hand_size).await,
        Command::Terminal { hand_size } => run_terminal(hand_size),
    }
}

/// Run the WebSocket game server
#[instrument(skip_all)]
async fn run_server(
    config: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    hand_size: Option<usize>,
) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dominoes=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load_or_default(&config)?.with_overrides(host, port, hand_size)?;
    info!(
        host = %config.host(),
        port = config.port(),
        hand_size = config.hand_size(),
        "Starting dominoes server"
    );

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    dominoes_server::serve(listener, AppState::with_hand_size(*config.hand_size())).await
}

/// Run a hot-seat game on stdin/stdout
fn run_terminal(hand_size: usize) -> Result<()> {
    // Logs go to stderr so they never interleave with prompts.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    validate_hand_size(hand_size)?;

    let stdin = std::io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), std::io::stdout());
    terminal.run(hand_size)?;
    Ok(())
}
