//! Subscriber-side errors.

/// Errors raised while subscribing to or reading the livefeed.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The WebSocket connection failed.
    #[error("livefeed connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    /// A frame was not a JSON `{ event, data }` object.
    #[error("malformed frame: {0}")]
    Frame(#[source] serde_json::Error),

    /// A known event carried a payload of the wrong shape.
    #[error("malformed {event} payload: {source}")]
    Payload {
        /// Event name as received.
        event: String,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
}
