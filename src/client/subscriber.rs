//! WebSocket subscriber for the livefeed.

use std::fmt;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::error::ClientError;
use super::events::FeedEvent;
use super::feed::FeedHandler;
use super::view::LiveGamesView;

/// An open livefeed connection.
pub struct LivefeedSubscriber {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    handler: FeedHandler,
}

impl fmt::Debug for LivefeedSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivefeedSubscriber")
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

impl LivefeedSubscriber {
    /// Connects to the livefeed at `url`, e.g.
    /// `ws://127.0.0.1:3000/livefeed`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the handshake fails.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (socket, _) = connect_async(url).await?;
        tracing::info!(%url, "subscribed to livefeed");
        Ok(Self {
            socket,
            handler: FeedHandler,
        })
    }

    /// Waits for the next decodable event.
    ///
    /// Malformed frames are logged and skipped. Returns `Ok(None)` once the
    /// server closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the socket fails.
    pub async fn next_event(&mut self) -> Result<Option<FeedEvent>, ClientError> {
        while let Some(frame) = self.socket.next().await {
            let text = match frame? {
                Message::Text(text) => text,
                Message::Close(_) => return Ok(None),
                _ => continue,
            };
            match FeedEvent::parse(text.as_str()) {
                Ok(event) => return Ok(Some(event)),
                Err(err) => tracing::warn!(error = %err, "skipping livefeed frame"),
            }
        }
        Ok(None)
    }

    /// Applies events to `view` until the connection closes, calling
    /// `on_change` after every event that changed the view.
    ///
    /// Returns the number of events handled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the socket fails.
    pub async fn run<F>(&mut self, view: &mut LiveGamesView, mut on_change: F) -> Result<u64, ClientError>
    where
        F: FnMut(&LiveGamesView),
    {
        let mut handled = 0u64;
        while let Some(event) = self.next_event().await? {
            handled += 1;
            if self.handler.handle(&event, view) {
                on_change(view);
            }
        }
        tracing::info!(handled, "livefeed closed");
        Ok(handled)
    }

    /// Sends a close frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the close cannot be sent.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.socket.send(Message::Close(None)).await?;
        Ok(())
    }
}
