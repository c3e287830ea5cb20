//! Command-line interface for dominoes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dominoes - two-player dominoes over WebSocket or in the terminal
#[derive(Parser, Debug)]
#[command(name = "dominoes")]
#[command(about = "Two-player dominoes server and terminal game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket game server
    Server {
        /// Path to the TOML config file (optional)
        #[arg(short, long, default_value = "dominoes.toml")]
        config: PathBuf,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Pieces dealt to each player (overrides the config file)
        #[arg(long)]
        hand_size: Option<usize>,
    },

    /// Play a two-player game at this terminal
    Terminal {
        /// Pieces dealt to each player
        #[arg(long, default_value_t = dominoes_engine::DEFAULT_HAND_SIZE)]
        hand_size: usize,
    },
}
