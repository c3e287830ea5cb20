//! HTTP routes and the WebSocket transport.

use crate::handler::ConnectionHandler;
use crate::message::WebMessage;
use crate::sessions::{ConnectionId, Outbound, Outbox, Seat, SessionRegistry};
use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument, warn};

/// Shared state behind every route.
#[derive(Debug, Clone)]
pub struct AppState {
    handler: ConnectionHandler,
    count: Arc<AtomicU64>,
}

impl AppState {
    /// Wraps a handler with a fresh connection counter.
    pub fn new(handler: ConnectionHandler) -> Self {
        Self {
            handler,
            count: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Creates state around an empty registry.
    pub fn with_hand_size(hand_size: usize) -> Self {
        Self::new(ConnectionHandler::new(
            Arc::new(SessionRegistry::new()),
            hand_size,
        ))
    }

    /// The connection handler.
    pub fn handler(&self) -> &ConnectionHandler {
        &self.handler
    }

    fn next_connection_id(&self) -> ConnectionId {
        format!("conn-{}", self.count.fetch_add(1, Ordering::Relaxed))
    }
}

const INDEX_HTML: &str = include_str!("../assets/index.html");
const CLIENT_JS: &str = include_str!("../assets/client.js");

/// Builds the router: the browser client at `/`, `/dominoes/{username}` for
/// play, `/health` for liveness checks.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/client.js", get(client_script))
        .route("/health", get(health))
        .route("/dominoes/{username}", get(join))
        .with_state(state)
}

/// Serves the router on `listener` until the process stops.
///
/// # Errors
///
/// Returns an error if the listener fails.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Dominoes server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn client_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], CLIENT_JS)
}

async fn health() -> &'static str {
    "ok"
}

async fn join(
    ws: WebSocketUpgrade,
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| bridge(socket, username, state))
}

/// Pumps frames between one socket and its seat until either side closes.
#[instrument(skip(socket, state))]
async fn bridge(socket: WebSocket, username: String, state: AppState) {
    let connection_id = state.next_connection_id();
    info!(%connection_id, "Client connected");

    let (outbox, mut outbound) = Outbox::channel();
    let seat = Seat::new(connection_id.clone(), username, outbox);
    let (mut sink, mut stream) = socket.split();

    state.handler.on_connect(seat.clone());

    'sesh: loop {
        tokio::select! {
            biased;
            next = outbound.recv() => match next {
                Some(Outbound::Message(message)) => match serde_json::to_string(&message) {
                    Ok(json) => if sink.send(Message::Text(json.into())).await.is_err() { break 'sesh },
                    Err(e) => error!(error = %e, "Failed to encode outbound message"),
                },
                Some(Outbound::Close) | None => {
                    let _ = sink.send(Message::Close(None)).await;
                    break 'sesh;
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<WebMessage>(text.as_str()) {
                    Ok(message) => state.handler.on_message(&seat, message),
                    Err(e) => {
                        warn!(error = %e, "Undecodable frame");
                        seat.outbox().send(WebMessage::error(format!("Invalid message: {}", e)));
                    }
                },
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break 'sesh,
                Some(Ok(_)) => continue 'sesh,
            },
        }
    }

    // Closing the receiver marks this seat dead for the waiting queue.
    drop(outbound);
    state.handler.on_disconnect(&connection_id);
    debug!(%connection_id, "Client disconnected");
}
