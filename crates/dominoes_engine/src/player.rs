//! Players and the hand of pieces they hold.

use crate::error::GameError;
use crate::piece::Piece;
use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, instrument};

/// Identifies one of the two seats at a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    /// First player, opens the game.
    One,
    /// Second player.
    Two,
}

impl PlayerId {
    /// Returns the opponent.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

/// A named player and the pieces in their hand.
///
/// Hand order is insertion order; it has no meaning for the rules but stays
/// stable so pieces can be picked by index.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct Player {
    /// Display name, fixed for the lifetime of the game.
    name: String,
    /// Pieces currently held.
    pieces: Vec<Piece>,
}

impl Player {
    /// Creates a player with an empty hand.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pieces: Vec::new(),
        }
    }

    /// Adds a piece to the hand.
    pub fn give(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// Adds several pieces to the hand.
    pub fn give_all(&mut self, pieces: impl IntoIterator<Item = Piece>) {
        self.pieces.extend(pieces);
    }

    /// Whether the hand holds this tile, in either orientation.
    pub fn contains(&self, piece: &Piece) -> bool {
        self.pieces.contains(piece)
    }

    /// Removes the first matching tile from the hand.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PieceNotInHand`] if the tile is not held.
    #[instrument(skip(self), fields(player = %self.name))]
    pub fn remove(&mut self, piece: &Piece) -> Result<Piece, GameError> {
        let index = self
            .pieces
            .iter()
            .position(|held| held == piece)
            .ok_or(GameError::PieceNotInHand)?;
        let removed = self.pieces.remove(index);
        debug!(%removed, remaining = self.pieces.len(), "Removed piece from hand");
        Ok(removed)
    }

    /// Looks up a piece by its position in the hand.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoPieceAt`] when the index is out of range.
    pub fn piece_at(&self, index: usize) -> Result<Piece, GameError> {
        self.pieces
            .get(index)
            .copied()
            .ok_or(GameError::NoPieceAt(index))
    }

    /// Number of pieces held.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True once the player has played every piece.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
