//! The line of play and the stock.

use crate::piece::Piece;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::VecDeque;

/// Pieces on the table, read left to right.
///
/// Adjacent pieces always touch on equal values: the right value of each
/// piece equals the left value of the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    pieces: VecDeque<Piece>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leftmost piece.
    pub fn first(&self) -> Option<&Piece> {
        self.pieces.front()
    }

    /// Rightmost piece.
    pub fn last(&self) -> Option<&Piece> {
        self.pieces.back()
    }

    /// The two exposed pip values, left then right.
    pub fn open_ends(&self) -> Option<(u8, u8)> {
        Some((self.first()?.left(), self.last()?.right()))
    }

    pub(crate) fn push_left(&mut self, piece: Piece) {
        self.pieces.push_front(piece);
    }

    pub(crate) fn push_right(&mut self, piece: Piece) {
        self.pieces.push_back(piece);
    }

    /// Iterates the line of play from left to right.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// Number of pieces played.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True before the opening piece is placed.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Checks that every adjacent pair touches on equal values.
    pub fn is_chain(&self) -> bool {
        self.pieces
            .iter()
            .zip(self.pieces.iter().skip(1))
            .all(|(a, b)| a.right() == b.left())
    }
}

impl From<Vec<Piece>> for Board {
    fn from(pieces: Vec<Piece>) -> Self {
        Self {
            pieces: pieces.into(),
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", piece)?;
        }
        write!(f, "]")
    }
}

/// Face-down draw pile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stock {
    pieces: VecDeque<Piece>,
}

impl Stock {
    /// A full double-six set in random order.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pieces = Piece::full_set();
        pieces.shuffle(rng);
        Self {
            pieces: pieces.into(),
        }
    }

    /// Takes the next piece, if any are left.
    pub fn draw(&mut self) -> Option<Piece> {
        self.pieces.pop_front()
    }

    /// Pieces left to draw.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True once every piece has been drawn.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Iterates the remaining pieces in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }
}

impl From<Vec<Piece>> for Stock {
    fn from(pieces: Vec<Piece>) -> Self {
        Self {
            pieces: pieces.into(),
        }
    }
}
