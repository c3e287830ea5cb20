//! Rules engine for two-player dominoes.
//!
//! - [`Piece`]: a double-six tile with orientation-independent equality.
//! - [`Player`]: a name and a hand of pieces.
//! - [`Board`] and [`Stock`]: the line of play and the draw pile.
//! - [`Game`]: dealing, turn order, move validation and end detection.
//!
//! The engine is synchronous and owns no locks; callers sharing a game
//! between threads wrap it in a mutex and hold it for the whole move.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod game;
mod piece;
mod player;

pub use board::{Board, Stock};
pub use error::{GameError, PieceError};
pub use game::{DEFAULT_HAND_SIZE, Game, Phase};
pub use piece::{MAX_PIPS, Piece, Place};
pub use player::{Player, PlayerId};
