//! The rules state machine for a two-player game.

use crate::board::{Board, Stock};
use crate::error::GameError;
use crate::piece::{Piece, Place};
use crate::player::{Player, PlayerId};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Pieces dealt to each player by default.
pub const DEFAULT_HAND_SIZE: usize = 7;

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, nothing dealt yet.
    Unstarted,
    /// Dealt and accepting moves.
    InProgress,
    /// A hand is empty or nobody can move. Terminal.
    Over,
}

/// A game of dominoes between two players.
///
/// Holds both hands, the stock and the line of play, and tracks whose turn
/// it is. Every piece of the set is in exactly one of those four places for
/// the whole game.
#[derive(Debug, Clone)]
pub struct Game {
    player1: Player,
    player2: Player,
    stock: Stock,
    board: Board,
    playing: Option<PlayerId>,
}

impl Game {
    /// Creates an unstarted game with a freshly shuffled stock.
    pub fn new(player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Self::with_rng(player1, player2, &mut rand::rng())
    }

    /// Creates an unstarted game, shuffling the stock with `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        player1: impl Into<String>,
        player2: impl Into<String>,
        rng: &mut R,
    ) -> Self {
        Self {
            player1: Player::new(player1),
            player2: Player::new(player2),
            stock: Stock::shuffled(rng),
            board: Board::new(),
            playing: None,
        }
    }

    /// Builds a game that is already under way.
    ///
    /// The caller is responsible for the pieces adding up to a full set;
    /// this is meant for setting up positions in tests and replays.
    pub fn from_parts(
        player1: Player,
        player2: Player,
        stock: Stock,
        board: Board,
        playing: PlayerId,
    ) -> Self {
        Self {
            player1,
            player2,
            stock,
            board,
            playing: Some(playing),
        }
    }

    /// Opens the game: one piece to the board, then `hand_size` pieces to
    /// each player in turn. Player one moves first.
    ///
    /// # Errors
    ///
    /// - [`GameError::AlreadyStarted`] if called twice.
    /// - [`GameError::NotEnoughStock`] if the stock cannot cover the deal.
    #[instrument(skip(self), fields(player1 = %self.player1.name(), player2 = %self.player2.name()))]
    pub fn start(&mut self, hand_size: usize) -> Result<(), GameError> {
        if self.playing.is_some() {
            return Err(GameError::AlreadyStarted);
        }

        let needed = hand_size
            .checked_mul(2)
            .and_then(|dealt| dealt.checked_add(1));
        let short = GameError::NotEnoughStock {
            needed: needed.unwrap_or(usize::MAX),
            available: self.stock.len(),
        };
        if needed.is_none_or(|needed| self.stock.len() < needed) {
            return Err(short);
        }

        let opening = self.stock.draw().ok_or_else(|| short.clone())?;
        self.board.push_right(opening);

        for _ in 0..hand_size {
            let first = self.stock.draw().ok_or_else(|| short.clone())?;
            self.player1.give(first);
            let second = self.stock.draw().ok_or_else(|| short.clone())?;
            self.player2.give(second);
        }

        self.playing = Some(PlayerId::One);
        info!(%opening, hand_size, stock = self.stock.len(), "Game started");
        Ok(())
    }

    /// Current lifecycle phase, derived from the live state.
    pub fn phase(&self) -> Phase {
        match self.playing {
            None => Phase::Unstarted,
            Some(_) if self.is_over() => Phase::Over,
            Some(_) => Phase::InProgress,
        }
    }

    /// Checks that `who` holds the turn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotYourTurn`] otherwise.
    pub fn ensure_turn(&self, who: PlayerId) -> Result<(), GameError> {
        match self.playing {
            Some(playing) if playing == who => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    /// Plays `piece` from `who`'s hand onto the given end of the board.
    ///
    /// On success the piece leaves the hand, joins the board oriented to fit,
    /// and the turn passes to the opponent. The oriented piece is returned.
    /// On failure nothing changes.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotInProgress`] before the deal or after the end.
    /// - [`GameError::NotYourTurn`] if `who` does not hold the turn.
    /// - [`GameError::PieceNotInHand`] if the piece is not in the hand.
    /// - [`GameError::NotPlayable`] if the piece does not match that end.
    #[instrument(skip(self))]
    pub fn play(&mut self, who: PlayerId, piece: Piece, place: Place) -> Result<Piece, GameError> {
        if self.phase() != Phase::InProgress {
            return Err(GameError::NotInProgress);
        }
        self.ensure_turn(who)?;
        if !self.player(who).contains(&piece) {
            return Err(GameError::PieceNotInHand);
        }

        let placed = match place {
            Place::L => self
                .board
                .first()
                .ok_or(GameError::EmptyBoard)?
                .play_on_left(piece)?,
            Place::R => self
                .board
                .last()
                .ok_or(GameError::EmptyBoard)?
                .play_on_right(piece)?,
        };

        self.player_mut(who).remove(&piece)?;
        match place {
            Place::L => self.board.push_left(placed),
            Place::R => self.board.push_right(placed),
        }
        self.switch_player();

        debug!(%placed, board = %self.board, "Piece placed");
        Ok(placed)
    }

    /// Takes one piece off the stock, or `None` if it is empty.
    ///
    /// The stock was shuffled at creation so pieces come off in order.
    pub fn draw_from_stock(&mut self) -> Option<Piece> {
        let piece = self.stock.draw();
        debug!(piece = ?piece, left = self.stock.len(), "Drew from stock");
        piece
    }

    /// Adds a piece to a player's hand.
    pub fn give_piece(&mut self, who: PlayerId, piece: Piece) {
        self.player_mut(who).give(piece);
    }

    /// Whether the piece fits either open end of the board.
    pub fn is_playable(&self, piece: &Piece) -> bool {
        match (self.board.first(), self.board.last()) {
            (Some(first), Some(last)) => {
                first.is_playable_on_left(piece) || last.is_playable_on_right(piece)
            }
            _ => false,
        }
    }

    /// True when nothing in the player's hand fits the board.
    pub fn player_needs_draw(&self, who: PlayerId) -> bool {
        !self
            .player(who)
            .pieces()
            .iter()
            .any(|piece| self.is_playable(piece))
    }

    /// Whether the game has ended.
    ///
    /// A started game ends when either hand is empty, or when the stock is
    /// empty and neither player can move.
    pub fn is_over(&self) -> bool {
        self.playing.is_some()
            && (self.player1.is_empty()
                || self.player2.is_empty()
                || (self.stock.is_empty()
                    && self.player_needs_draw(PlayerId::One)
                    && self.player_needs_draw(PlayerId::Two)))
    }

    /// The player holding fewer pieces once the game is over.
    ///
    /// `None` while the game runs or when both hands are the same size.
    pub fn winner(&self) -> Option<PlayerId> {
        if !self.is_over() {
            return None;
        }
        match self.player1.len().cmp(&self.player2.len()) {
            std::cmp::Ordering::Less => Some(PlayerId::One),
            std::cmp::Ordering::Greater => Some(PlayerId::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Passes the turn to the other player.
    pub fn switch_player(&mut self) {
        if let Some(playing) = self.playing {
            self.playing = Some(playing.opponent());
        }
    }

    /// Whether any pieces are left to draw.
    pub fn has_stock(&self) -> bool {
        !self.stock.is_empty()
    }

    /// Pieces left to draw.
    pub fn stock_size(&self) -> usize {
        self.stock.len()
    }

    /// The draw pile.
    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    /// The line of play.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whose turn it is, once the game has started.
    pub fn playing_player(&self) -> Option<PlayerId> {
        self.playing
    }

    /// Returns a player by seat.
    pub fn player(&self, who: PlayerId) -> &Player {
        match who {
            PlayerId::One => &self.player1,
            PlayerId::Two => &self.player2,
        }
    }

    /// Returns the opponent's player.
    pub fn other(&self, who: PlayerId) -> &Player {
        self.player(who.opponent())
    }

    fn player_mut(&mut self, who: PlayerId) -> &mut Player {
        match who {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        }
    }
}
