//! Livefeed connection loop.
//!
//! Greets the subscriber with the current live games, then forwards every
//! event from the bus until either side goes away.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::FeedFrame;
use crate::domain::{LiveEvent, LiveGame};

/// Runs the read/write loop for a single livefeed connection.
///
/// - Sends `after connect` with the games in `live`.
/// - Forwards each [`LiveEvent`] from `event_rx` as a frame.
/// - Ignores client text; ends on Close or when the bus shuts down.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<LiveEvent>,
    live: Vec<LiveGame>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    match FeedFrame::after_connect(&live).and_then(|frame| frame.to_json()) {
        Ok(json) => {
            if ws_tx.send(Message::text(json)).await.is_err() {
                return;
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to encode greeting");
            return;
        }
    }
    tracing::debug!(live_games = live.len(), "livefeed subscriber connected");

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(live_event) => {
                        let json = match FeedFrame::from_event(&live_event).and_then(|f| f.to_json()) {
                            Ok(json) => json,
                            Err(err) => {
                                tracing::error!(error = %err, "failed to encode event");
                                continue;
                            }
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "livefeed subscriber lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("livefeed connection closed");
}
