//! Ingests games from the upstream live socket.

use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::models::ApiMessage;
use crate::error::LivefeedError;
use crate::service::GameService;

/// Connects to the upstream live socket at `url` and feeds every message
/// into [`GameService::ingest`].
///
/// Unparseable frames and rejected messages are logged and skipped. Returns
/// when the upstream closes the connection; there is no reconnect.
///
/// # Errors
///
/// Returns [`LivefeedError::Upstream`] if the connection cannot be opened
/// or fails mid-stream.
pub async fn run_upstream_feed(url: &str, service: GameService) -> Result<u64, LivefeedError> {
    let (mut socket, _) = connect_async(url)
        .await
        .map_err(|e| LivefeedError::Upstream(format!("connect {url}: {e}")))?;
    tracing::info!(%url, "upstream live feed connected");

    let mut ingested = 0u64;
    while let Some(frame) = socket.next().await {
        let frame = frame.map_err(|e| LivefeedError::Upstream(e.to_string()))?;
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let message = match ApiMessage::parse(text.as_str()) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(error = %err, "unparseable upstream frame");
                continue;
            }
        };

        match service.ingest(&message).await {
            Ok(()) => ingested += 1,
            Err(err) => {
                tracing::warn!(game_id = %message.game_id(), error = %err, "upstream message rejected");
            }
        }
    }

    tracing::info!(ingested, "upstream live feed closed");
    Ok(ingested)
}
