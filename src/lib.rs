//! Dominoes - two-player dominoes over WebSocket or at one terminal
//!
//! The rules live in [`dominoes_engine`] and the WebSocket front end in
//! [`dominoes_server`]. This crate adds the pieces the `dominoes` binary
//! needs on top of them.
//!
//! # Architecture
//!
//! - **Config**: server settings from `dominoes.toml` and the command line
//! - **Terminal**: hot-seat play over any reader and writer
//!
//! # Example
//!
//! ```no_run
//! use dominoes::Terminal;
//!
//! let stdin = std::io::stdin();
//! let mut terminal = Terminal::new(stdin.lock(), std::io::stdout());
//! let game = terminal.run(dominoes_engine::DEFAULT_HAND_SIZE)?;
//! assert!(game.is_over());
//! # Ok::<(), dominoes::TerminalError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod terminal;

pub use config::{ConfigError, ServerConfig, validate_hand_size};
pub use terminal::{Terminal, TerminalError};
