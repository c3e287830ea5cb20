//! WebSocket front end for two-player dominoes.
//!
//! Clients connect to `/dominoes/{username}`. The first connection waits;
//! the next one is paired with it and a game starts. Moves arrive as JSON
//! [`WebMessage`]s and each player gets a snapshot of the game from their
//! own seat after every change.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use dominoes_server::{AppState, serve};
//!
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", 3000)).await?;
//! serve(listener, AppState::with_hand_size(7)).await
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod handler;
mod message;
mod server;
mod sessions;

pub use error::HandlerError;
pub use handler::ConnectionHandler;
pub use message::{MessageType, WebMessage, fields};
pub use server::{AppState, router, serve};
pub use sessions::{ConnectionId, GameSession, Outbound, Outbox, Seat, SessionRegistry};
