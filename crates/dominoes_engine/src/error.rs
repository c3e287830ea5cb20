//! Error types for the dominoes engine.

use crate::piece::{Piece, Place};

/// A piece was built with a pip value outside `[0, 6]`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PieceError {
    /// One half of the piece is out of range.
    #[display("The number on {side} side should be in interval [0,6]")]
    OutOfRange {
        /// Which half was rejected.
        side: Place,
        /// The rejected value.
        value: u8,
    },
}

impl std::error::Error for PieceError {}

/// A rule violation raised while playing.
///
/// These are expected, player-triggered outcomes: the caller reports them
/// back to whoever made the move and the game carries on.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The acting player does not hold the turn.
    #[display("It's not your turn to play")]
    NotYourTurn,

    /// The piece is not in the acting player's hand.
    #[display("You don't have that piece to play")]
    PieceNotInHand,

    /// The piece does not match the open end it was played against.
    #[display("Piece {piece} is not playable on {place} with {end}")]
    NotPlayable {
        /// The piece the player tried to place.
        piece: Piece,
        /// The requested end of the board.
        place: Place,
        /// The piece currently at that end.
        end: Piece,
    },

    /// Index-based selection past the end of a hand.
    #[display("There's no piece at index {}", _0)]
    NoPieceAt(usize),

    /// `start` was called on a game that is already running.
    #[display("The game has already started")]
    AlreadyStarted,

    /// The game has not started yet or is already over.
    #[display("The game is not in progress")]
    NotInProgress,

    /// The stock cannot cover the opening piece plus both hands.
    #[display("The stock has {available} pieces but {needed} are needed to deal")]
    NotEnoughStock {
        /// Pieces required by the deal.
        needed: usize,
        /// Pieces left in the stock.
        available: usize,
    },

    /// There is nothing on the board to play against.
    #[display("There's no piece on the board to play against")]
    EmptyBoard,
}

impl std::error::Error for GameError {}
