//! Domino pieces and the ends of the line of play they can be placed on.

use crate::error::{GameError, PieceError};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use tracing::instrument;

/// Highest pip value on a double-six set.
pub const MAX_PIPS: u8 = 6;

/// End of the line of play a piece is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Place {
    /// Left end (start of the line).
    #[display("left")]
    L,
    /// Right end (end of the line).
    #[display("right")]
    R,
}

/// A domino tile: two pip values in `[0, 6]`.
///
/// Pieces are immutable values. Placing a piece against the line of play
/// yields a copy oriented to fit instead of flipping the candidate in place.
///
/// Equality ignores orientation: `<1:4>` and `<4:1>` are the same tile.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPiece")]
pub struct Piece {
    left: u8,
    right: u8,
}

/// Unchecked wire form, validated through [`Piece::new`].
#[derive(Deserialize)]
struct RawPiece {
    left: u8,
    right: u8,
}

impl TryFrom<RawPiece> for Piece {
    type Error = PieceError;

    fn try_from(raw: RawPiece) -> Result<Self, Self::Error> {
        Piece::new(raw.left, raw.right)
    }
}

impl Piece {
    /// Creates a piece, rejecting pip values above six.
    pub fn new(left: u8, right: u8) -> Result<Self, PieceError> {
        if left > MAX_PIPS {
            return Err(PieceError::OutOfRange {
                side: Place::L,
                value: left,
            });
        }
        if right > MAX_PIPS {
            return Err(PieceError::OutOfRange {
                side: Place::R,
                value: right,
            });
        }
        Ok(Self { left, right })
    }

    /// Left pip value in the current orientation.
    pub fn left(&self) -> u8 {
        self.left
    }

    /// Right pip value in the current orientation.
    pub fn right(&self) -> u8 {
        self.right
    }

    /// The same tile with its two halves swapped.
    pub fn rotated(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }

    /// True when both halves carry the same value.
    pub fn is_double(&self) -> bool {
        self.left == self.right
    }

    /// Total number of pips on the tile.
    pub fn pips(&self) -> u8 {
        self.left + self.right
    }

    /// Whether `candidate` can be placed to the left of this piece.
    pub fn is_playable_on_left(&self, candidate: &Piece) -> bool {
        self.left == candidate.right || self.left == candidate.left
    }

    /// Whether `candidate` can be placed to the right of this piece.
    pub fn is_playable_on_right(&self, candidate: &Piece) -> bool {
        self.right == candidate.left || self.right == candidate.right
    }

    /// Places `candidate` to the left of this piece.
    ///
    /// Returns the candidate oriented so that its right value touches this
    /// piece's left value.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotPlayable`] when neither half matches.
    #[instrument(level = "trace")]
    pub fn play_on_left(&self, candidate: Piece) -> Result<Piece, GameError> {
        if !self.is_playable_on_left(&candidate) {
            return Err(GameError::NotPlayable {
                piece: candidate,
                place: Place::L,
                end: *self,
            });
        }
        if self.left == candidate.left {
            Ok(candidate.rotated())
        } else {
            Ok(candidate)
        }
    }

    /// Places `candidate` to the right of this piece.
    ///
    /// Returns the candidate oriented so that its left value touches this
    /// piece's right value.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotPlayable`] when neither half matches.
    #[instrument(level = "trace")]
    pub fn play_on_right(&self, candidate: Piece) -> Result<Piece, GameError> {
        if !self.is_playable_on_right(&candidate) {
            return Err(GameError::NotPlayable {
                piece: candidate,
                place: Place::R,
                end: *self,
            });
        }
        if self.right == candidate.right {
            Ok(candidate.rotated())
        } else {
            Ok(candidate)
        }
    }

    /// The 28 tiles of a double-six set, in canonical order.
    pub fn full_set() -> Vec<Piece> {
        (0..=MAX_PIPS)
            .flat_map(|i| (i..=MAX_PIPS).map(move |j| Piece { left: i, right: j }))
            .collect()
    }

    fn key(&self) -> (u8, u8) {
        (self.left.min(self.right), self.left.max(self.right))
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}:{}>", self.left, self.right)
    }
}
