//! Live push channel
//!
//! `GET /api/v1/live` upgrades to a WebSocket. Each accepted connection runs
//! two cooperating loops:
//!
//! 1. **Send loop** - drains the subscriber's event channel and writes
//!    `recordCreated`/`recordDeleted` frames to the socket.
//! 2. **Recv loop** - reads frames from the socket and ingests
//!    `newReading` submissions.
//!
//! Push ingestion is fire-and-forget: failures are logged and swallowed, the
//! submitting peer receives no acknowledgment either way. When either loop
//! finishes the peer is unregistered from the hub.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use sonda_live::RecordEvent;
use sonda_store::NewReading;

use crate::state::AppState;

/// Client → server messages on the push channel
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
enum ClientMessage {
    /// Submit a reading for ingestion
    NewReading(NewReading),
}

/// Push channel routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/live", get(ws_upgrade))
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_session(socket, state))
}

/// Drive a single push-channel connection to completion
async fn run_session(socket: WebSocket, state: AppState) {
    let (id, rx) = match state.live.subscribe() {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, "rejecting live connection");
            return;
        }
    };

    debug!(id, "live peer connected");

    let (sender, receiver) = socket.split();

    // Spawn the send loop (event channel → WebSocket sender)
    let send_handle = tokio::spawn(send_loop(sender, rx));

    // Run the receive loop in-place (WebSocket receiver → ingestion)
    recv_loop(receiver, &state).await;

    // Receiving finished; abort sender and unregister
    send_handle.abort();
    let _ = state.live.unsubscribe(id);

    debug!(id, "live peer disconnected");
}

/// Broadcast events → WebSocket frames
async fn send_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Arc<RecordEvent>>,
) {
    while let Some(event) = rx.recv().await {
        let frame = match serde_json::to_string(event.as_ref()) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode live event");
                continue;
            }
        };

        if sender.send(Message::Text(frame.into())).await.is_err() {
            break;
        }
    }
}

/// WebSocket frames → ingestion
async fn recv_loop(mut receiver: SplitStream<WebSocket>, state: &AppState) {
    while let Some(result) = receiver.next().await {
        let frame = match result {
            Ok(frame) => frame,
            Err(e) => {
                debug!(error = %e, "live recv error");
                break;
            }
        };

        match frame {
            Message::Text(text) => ingest_frame(text.as_str(), state).await,
            Message::Binary(bytes) => {
                ingest_frame(&String::from_utf8_lossy(&bytes), state).await
            }
            Message::Close(_) => break,
            // Ping/pong frames are handled transparently by axum.
            _ => {}
        }
    }
}

/// Parse and ingest one push frame
///
/// Same validation, persistence, and broadcast path as the synchronous
/// create endpoint, but every failure ends here in the log.
async fn ingest_frame(text: &str, state: &AppState) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(error = %e, "ignoring malformed live frame");
            return;
        }
    };

    match msg {
        ClientMessage::NewReading(payload) => {
            match state.store.readings().insert(payload).await {
                Ok(reading) => state.live.publish(RecordEvent::RecordCreated(reading)),
                Err(e) => warn!(error = %e, "failed to store pushed reading"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sonda_live::LiveHub;
    use sonda_store::ReadingStore;

    async fn test_state() -> AppState {
        let store = Arc::new(ReadingStore::open_memory().await.unwrap());
        let live = Arc::new(LiveHub::new());
        AppState::new(store, live)
    }

    #[tokio::test]
    async fn test_ingest_frame_persists_and_broadcasts() {
        let state = test_state().await;
        let (_id, mut rx) = state.live.subscribe().unwrap();

        let frame = json!({
            "event": "newReading",
            "data": {"name": "temp1", "kind": "sensor", "value": 21.5, "unit": "C"}
        })
        .to_string();

        ingest_frame(&frame, &state).await;

        // Persisted
        let stored = state.store.readings().list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name.as_deref(), Some("temp1"));

        // Broadcast to the connected subscriber
        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            RecordEvent::RecordCreated(r) => assert_eq!(r.id, stored[0].id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_frame_is_swallowed() {
        let state = test_state().await;
        let (_id, mut rx) = state.live.subscribe().unwrap();

        ingest_frame("not json at all", &state).await;
        ingest_frame(r#"{"event": "unknownThing", "data": {}}"#, &state).await;

        assert!(state.store.readings().list().await.unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_push_ingest_is_logged_not_raised() {
        // Unavailable store: ingestion fails, but nothing panics and no
        // event is published.
        let store = Arc::new(ReadingStore::unavailable());
        let live = Arc::new(LiveHub::new());
        let state = AppState::new(store, live);
        let (_id, mut rx) = state.live.subscribe().unwrap();

        let frame = json!({"event": "newReading", "data": {"name": "temp1"}}).to_string();
        ingest_frame(&frame, &state).await;

        assert!(rx.try_recv().is_err());
    }
}
