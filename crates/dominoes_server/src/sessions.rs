//! Seats, live games and the matchmaking queue.

use crate::error::HandlerError;
use crate::message::WebMessage;
use derive_getters::Getters;
use derive_new::new;
use dominoes_engine::{Game, PlayerId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a WebSocket connection.
pub type ConnectionId = String;

/// Something the transport should do with its socket.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Write a message frame.
    Message(WebMessage),
    /// Close the socket.
    Close,
}

/// Sending half of a connection's outbound queue.
///
/// The transport owns the receiving half; once it drops it the outbox
/// reports itself closed.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: UnboundedSender<Outbound>,
}

impl Outbox {
    /// Wraps an existing sender.
    pub fn new(tx: UnboundedSender<Outbound>) -> Self {
        Self { tx }
    }

    /// Creates an outbox and the receiver the transport drains.
    pub fn channel() -> (Self, UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queues a message. Returns false if the connection is gone.
    pub fn send(&self, message: WebMessage) -> bool {
        let kind = message.kind();
        match self.tx.send(Outbound::Message(message)) {
            Ok(()) => true,
            Err(_) => {
                warn!(%kind, "Dropping message for closed connection");
                false
            }
        }
    }

    /// Asks the transport to close the socket.
    pub fn close(&self) {
        let _ = self.tx.send(Outbound::Close);
    }

    /// Whether the transport is still draining this outbox.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// A connection with the name its player joined under.
#[derive(Debug, Clone, Getters, new)]
pub struct Seat {
    connection_id: ConnectionId,
    name: String,
    outbox: Outbox,
}

/// One live game and the two connections playing it.
#[derive(Debug)]
pub struct GameSession {
    game: Mutex<Game>,
    seats: [Seat; 2],
}

impl GameSession {
    /// Seats `first` as player one and `second` as player two of `game`.
    pub fn new(game: Game, first: Seat, second: Seat) -> Self {
        Self {
            game: Mutex::new(game),
            seats: [first, second],
        }
    }

    /// Locks the game for a read-modify-write.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Internal`] if an earlier holder panicked.
    pub fn game(&self) -> Result<MutexGuard<'_, Game>, HandlerError> {
        self.game
            .lock()
            .map_err(|_| HandlerError::Internal("game lock poisoned".to_string()))
    }

    /// Which player a connection is seated as.
    pub fn player_of(&self, connection_id: &str) -> Option<PlayerId> {
        if self.seats[0].connection_id() == connection_id {
            Some(PlayerId::One)
        } else if self.seats[1].connection_id() == connection_id {
            Some(PlayerId::Two)
        } else {
            None
        }
    }

    /// The seat of a player.
    pub fn seat(&self, who: PlayerId) -> &Seat {
        match who {
            PlayerId::One => &self.seats[0],
            PlayerId::Two => &self.seats[1],
        }
    }

    /// Both seats, player one first.
    pub fn seats(&self) -> &[Seat; 2] {
        &self.seats
    }
}

/// Process-wide table of live games and the queue of waiting connections.
///
/// Each operation is a single insert, remove or pop, so state stays
/// consistent even if a lock holder panicked.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    games: Mutex<HashMap<ConnectionId, Arc<GameSession>>>,
    waiting: Mutex<VecDeque<Seat>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a connection at the back of the waiting queue.
    #[instrument(skip(self, seat), fields(connection_id = %seat.connection_id()))]
    pub fn enqueue_waiting(&self, seat: Seat) {
        let mut waiting = lock(&self.waiting);
        waiting.push_back(seat);
        debug!(waiting = waiting.len(), "Queued connection");
    }

    /// Pops the oldest waiting connection that is still open.
    ///
    /// Closed connections found along the way are discarded.
    pub fn dequeue_waiting(&self) -> Option<Seat> {
        let mut waiting = lock(&self.waiting);
        while let Some(seat) = waiting.pop_front() {
            if seat.outbox().is_open() {
                return Some(seat);
            }
            debug!(connection_id = %seat.connection_id(), "Discarding closed waiting connection");
        }
        None
    }

    /// Maps a connection to its game.
    pub fn register_game(&self, connection_id: impl Into<ConnectionId>, session: Arc<GameSession>) {
        lock(&self.games).insert(connection_id.into(), session);
    }

    /// The game a connection is playing, if any.
    pub fn lookup_game(&self, connection_id: &str) -> Option<Arc<GameSession>> {
        lock(&self.games).get(connection_id).cloned()
    }

    /// Forgets a connection's game. Missing entries are ignored.
    pub fn unregister_game(&self, connection_id: &str) {
        if lock(&self.games).remove(connection_id).is_some() {
            debug!(connection_id, "Unregistered game");
        }
    }

    /// Drops every game and waiting connection.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        lock(&self.games).clear();
        lock(&self.waiting).clear();
        info!("Cleared session registry");
    }

    /// Connections currently waiting.
    pub fn waiting_len(&self) -> usize {
        lock(&self.waiting).len()
    }

    /// Connections currently mapped to a game.
    pub fn game_count(&self) -> usize {
        lock(&self.games).len()
    }
}
