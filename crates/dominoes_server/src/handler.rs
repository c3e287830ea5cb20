//! Matchmaking and per-message game logic for WebSocket connections.

use crate::error::HandlerError;
use crate::message::{MessageType, WebMessage, fields};
use crate::sessions::{GameSession, Seat, SessionRegistry};
use dominoes_engine::{Game, GameError, Piece, Place, PlayerId};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// A message bound for one player of a game.
type Delivery = (PlayerId, WebMessage);

/// Reacts to connection lifecycle events.
///
/// The transport calls [`on_connect`](Self::on_connect) when a socket opens,
/// [`on_message`](Self::on_message) for each decoded frame and
/// [`on_disconnect`](Self::on_disconnect) once the socket is gone.
/// Outgoing messages are queued on seat outboxes, never written directly.
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    registry: Arc<SessionRegistry>,
    hand_size: usize,
}

impl ConnectionHandler {
    /// Creates a handler dealing `hand_size` pieces per player.
    pub fn new(registry: Arc<SessionRegistry>, hand_size: usize) -> Self {
        Self {
            registry,
            hand_size,
        }
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Pairs the connection with the oldest waiting one, or queues it.
    #[instrument(skip(self, seat), fields(connection_id = %seat.connection_id(), player = %seat.name()))]
    pub fn on_connect(&self, seat: Seat) {
        match self.registry.dequeue_waiting() {
            Some(waiting) => {
                info!(opponent = %waiting.name(), "Pairing with waiting connection");
                self.pair(waiting, seat);
            }
            None => {
                info!("No opponent yet, waiting for player");
                self.registry.enqueue_waiting(seat.clone());
                seat.outbox().send(WebMessage::waiting());
            }
        }
    }

    /// Starts a game with `first` as player one and `second` as player two.
    ///
    /// If either side turns out to be gone by the time the game is
    /// registered, the game is torn down straight away and the other side
    /// is closed.
    #[instrument(skip_all, fields(first = %first.connection_id(), second = %second.connection_id()))]
    pub fn pair(&self, first: Seat, second: Seat) {
        let mut game = Game::new(first.name().clone(), second.name().clone());
        let opened = game
            .start(self.hand_size)
            .map_err(HandlerError::from)
            .and_then(|()| {
                Ok([
                    WebMessage::snapshot(MessageType::NewGame, &game, PlayerId::One)?,
                    WebMessage::snapshot(MessageType::NewGame, &game, PlayerId::Two)?,
                ])
            });

        let [to_first, to_second] = match opened {
            Ok(messages) => messages,
            Err(err) => {
                error!(error = ?err, "Failed to open game");
                for seat in [&first, &second] {
                    seat.outbox().send(WebMessage::error(err.to_string()));
                    seat.outbox().close();
                }
                return;
            }
        };

        let session = Arc::new(GameSession::new(game, first, second));
        for seat in session.seats() {
            self.registry
                .register_game(seat.connection_id().clone(), Arc::clone(&session));
        }
        let delivered = [
            session.seat(PlayerId::One).outbox().send(to_first),
            session.seat(PlayerId::Two).outbox().send(to_second),
        ];

        // A seat that closed before registration saw no game to tear down.
        let gone = session
            .seats()
            .iter()
            .zip(delivered)
            .find(|(seat, sent)| !sent || !seat.outbox().is_open())
            .map(|(seat, _)| seat.connection_id().clone());
        if let Some(gone) = gone {
            warn!(connection_id = %gone, "Seat left while the game was opening");
            self.on_disconnect(&gone);
        }
    }

    /// Applies one client message to the connection's game.
    ///
    /// Rejections go back to the sender as `ERROR_MESSAGE` and leave the game
    /// untouched. A connection with no game is told so and closed.
    #[instrument(skip(self, seat, message), fields(connection_id = %seat.connection_id(), kind = %message.kind()))]
    pub fn on_message(&self, seat: &Seat, message: WebMessage) {
        let found = self
            .registry
            .lookup_game(seat.connection_id())
            .and_then(|session| session.player_of(seat.connection_id()).map(|who| (session, who)));

        let Some((session, who)) = found else {
            error!("Game for connection not found in memory");
            seat.outbox()
                .send(WebMessage::error(HandlerError::GameNotFound.to_string()));
            seat.outbox().close();
            self.on_disconnect(seat.connection_id());
            return;
        };

        // Messages are built under the game lock and sent after it is released.
        match self.dispatch(&session, who, &message) {
            Ok(deliveries) => {
                for (to, outgoing) in deliveries {
                    session.seat(to).outbox().send(outgoing);
                }
            }
            Err(err @ HandlerError::Internal(_)) => {
                error!(error = ?err, "Failed to handle message");
                seat.outbox().send(WebMessage::error(err.to_string()));
            }
            Err(err) => {
                info!(error = %err, "Invalid play");
                seat.outbox().send(WebMessage::error(err.to_string()));
            }
        }
    }

    fn dispatch(
        &self,
        session: &GameSession,
        who: PlayerId,
        message: &WebMessage,
    ) -> Result<Vec<Delivery>, HandlerError> {
        match message.kind() {
            MessageType::PlayAPiece => {
                let (piece, place) = parse_play(message)?;
                let mut game = session.game()?;
                game.play(who, piece, place)?;
                if game.is_over() {
                    Ok(game_over(&game))
                } else {
                    Ok(vec![
                        (who, WebMessage::snapshot(MessageType::NextPlay, &game, who)?),
                        (
                            who.opponent(),
                            WebMessage::snapshot(MessageType::NextPlay, &game, who.opponent())?,
                        ),
                    ])
                }
            }
            MessageType::GetFromStock => {
                let mut game = session.game()?;
                game.ensure_turn(who)?;

                if !game.has_stock() {
                    if game.is_over() {
                        return Ok(game_over(&game));
                    }
                    debug!("Stock is empty, passing the turn");
                    game.switch_player();
                    return Ok(vec![
                        (who, WebMessage::snapshot(MessageType::NoPiecesOnStock, &game, who)?),
                        (
                            who.opponent(),
                            WebMessage::snapshot(MessageType::NextPlay, &game, who.opponent())?,
                        ),
                    ]);
                }

                if game.is_over() {
                    return Err(GameError::NotInProgress.into());
                }
                let piece = game
                    .draw_from_stock()
                    .ok_or_else(|| HandlerError::Internal("stock emptied while drawing".to_string()))?;
                game.give_piece(who, piece);
                Ok(vec![(
                    who,
                    WebMessage::snapshot_with_piece(MessageType::NewPieceFromStock, &game, who, piece)?,
                )])
            }
            other => {
                warn!(kind = %other, "Unsupported message type");
                Err(HandlerError::Unrecognized)
            }
        }
    }

    /// Closes the peer of a departed connection and forgets their game.
    ///
    /// Safe to call for connections that never had a game or whose game
    /// was already torn down.
    #[instrument(skip(self))]
    pub fn on_disconnect(&self, connection_id: &str) {
        let Some(session) = self.registry.lookup_game(connection_id) else {
            info!("There's no game going on. Nothing to do here.");
            return;
        };

        for seat in session.seats() {
            if seat.connection_id() != connection_id && seat.outbox().is_open() {
                info!(peer = %seat.connection_id(), "Closing the peer connection");
                seat.outbox().close();
            }
            self.registry.unregister_game(seat.connection_id());
        }
    }
}

fn game_over(game: &Game) -> Vec<Delivery> {
    let over = WebMessage::game_over(game);
    info!(winner = ?game.winner(), "Game over");
    vec![(PlayerId::One, over.clone()), (PlayerId::Two, over)]
}

/// Reads the `piece` and `place` fields of a `PLAY_A_PIECE` message.
fn parse_play(message: &WebMessage) -> Result<(Piece, Place), HandlerError> {
    let field = |name: &str| {
        message
            .field(name)
            .cloned()
            .ok_or_else(|| HandlerError::Malformed(format!("Missing field `{}`", name)))
    };

    let piece: Piece =
        serde_json::from_value(field(fields::PIECE)?).map_err(|e| HandlerError::Malformed(e.to_string()))?;
    let place: Place =
        serde_json::from_value(field(fields::PLACE)?).map_err(|e| HandlerError::Malformed(e.to_string()))?;
    Ok((piece, place))
}
