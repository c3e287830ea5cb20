//! Errors raised while handling a client message.

use dominoes_engine::GameError;

/// Why a client message could not be applied.
///
/// The `Display` text is what the client sees in its `ERROR_MESSAGE`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum HandlerError {
    /// No game is registered for the connection.
    #[display("Game not found in memory. Closing the session")]
    GameNotFound,

    /// The message type is not one the server accepts.
    #[display("Unrecognized message type")]
    Unrecognized,

    /// A required field is missing or invalid.
    #[display("{}", _0)]
    Malformed(String),

    /// The game rejected the move.
    #[display("{}", _0)]
    Game(GameError),

    /// Anything else. Details are logged, never sent.
    #[display("Generic error")]
    Internal(String),
}

impl std::error::Error for HandlerError {}

impl From<GameError> for HandlerError {
    fn from(err: GameError) -> Self {
        Self::Game(err)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("Failed to encode message: {}", err))
    }
}
