//! Wire messages exchanged with browser clients.
//!
//! Every message is a type tag plus a map of named fields:
//! `{"type": "NEXT_PLAY", "content": {"board": [...], ...}}`.

use dominoes_engine::{Game, Piece, PlayerId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names used in message content.
pub mod fields {
    /// Line of play.
    pub const BOARD: &str = "board";
    /// Receiving player's own snapshot (name and hand).
    pub const PLAYER: &str = "player";
    /// Piece being played.
    pub const PIECE: &str = "piece";
    /// Piece just drawn from the stock.
    pub const NEW_PIECE: &str = "newPiece";
    /// End of the board to play on.
    pub const PLACE: &str = "place";
    /// Pieces left in the stock.
    pub const STOCK_SIZE: &str = "stockSize";
    /// Name of the player holding the turn.
    pub const PLAYING_PLAYER: &str = "playingPlayer";
    /// Name of the opponent.
    pub const OTHER_PLAYER: &str = "otherPlayer";
    /// Name of the winner, empty for a draw.
    pub const WINNER_PLAYER: &str = "winnerPlayer";
    /// Error text.
    pub const ERROR: &str = "error";
}

/// Kind of a wire message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// A game was created; carries the receiver's snapshot.
    NewGame,
    /// No opponent yet; the connection is queued.
    WaitingForPlayer,
    /// Client wants to place a piece.
    PlayAPiece,
    /// A move was applied; carries the receiver's snapshot.
    NextPlay,
    /// The game ended.
    GameOver,
    /// Client wants a piece from the stock.
    GetFromStock,
    /// The requesting player drew a piece.
    NewPieceFromStock,
    /// The stock is empty and the requesting player lost the turn.
    NoPiecesOnStock,
    /// A request was rejected.
    ErrorMessage,
    /// Any tag this server does not know.
    #[serde(other)]
    Unrecognized,
}

/// A typed envelope around a map of content fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebMessage {
    #[serde(rename = "type")]
    kind: MessageType,
    #[serde(default)]
    content: Map<String, Value>,
}

impl WebMessage {
    /// Creates a message with no content.
    pub fn new(kind: MessageType) -> Self {
        Self {
            kind,
            content: Map::new(),
        }
    }

    /// Creates a message with the given content.
    pub fn with_content(kind: MessageType, content: Map<String, Value>) -> Self {
        Self { kind, content }
    }

    /// The message kind.
    pub fn kind(&self) -> MessageType {
        self.kind
    }

    /// All content fields.
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// One content field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.content.get(name)
    }

    /// Tells a connection it is queued for an opponent.
    pub fn waiting() -> Self {
        Self::new(MessageType::WaitingForPlayer)
    }

    /// Reports a rejected request.
    pub fn error(text: impl Into<String>) -> Self {
        let mut content = Map::new();
        content.insert(fields::ERROR.to_string(), Value::String(text.into()));
        Self::with_content(MessageType::ErrorMessage, content)
    }

    /// Announces the end of a game with the winner's name, or `""` for a draw.
    pub fn game_over(game: &Game) -> Self {
        let winner = game
            .winner()
            .map(|who| game.player(who).name().clone())
            .unwrap_or_default();
        let mut content = Map::new();
        content.insert(fields::WINNER_PLAYER.to_string(), Value::String(winner));
        Self::with_content(MessageType::GameOver, content)
    }

    /// The game as seen by `who`: board, own hand, whose turn it is,
    /// opponent's name and stock size.
    ///
    /// # Errors
    ///
    /// Fails only if the board or hand cannot be encoded.
    pub fn snapshot(kind: MessageType, game: &Game, who: PlayerId) -> Result<Self, serde_json::Error> {
        let playing = game
            .playing_player()
            .map(|p| game.player(p).name().clone())
            .unwrap_or_default();

        let mut content = Map::new();
        content.insert(fields::BOARD.to_string(), serde_json::to_value(game.board())?);
        content.insert(fields::PLAYER.to_string(), serde_json::to_value(game.player(who))?);
        content.insert(fields::PLAYING_PLAYER.to_string(), Value::String(playing));
        content.insert(
            fields::OTHER_PLAYER.to_string(),
            Value::String(game.other(who).name().clone()),
        );
        content.insert(fields::STOCK_SIZE.to_string(), Value::from(game.stock_size()));
        Ok(Self::with_content(kind, content))
    }

    /// A snapshot that also carries the piece `who` just drew.
    ///
    /// # Errors
    ///
    /// Fails only if the snapshot cannot be encoded.
    pub fn snapshot_with_piece(
        kind: MessageType,
        game: &Game,
        who: PlayerId,
        new_piece: Piece,
    ) -> Result<Self, serde_json::Error> {
        let mut message = Self::snapshot(kind, game, who)?;
        message
            .content
            .insert(fields::NEW_PIECE.to_string(), serde_json::to_value(new_piece)?);
        Ok(message)
    }
}
