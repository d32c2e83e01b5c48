//! Service error types with HTTP status code mapping.
//!
//! [`LivefeedError`] is the central error type for the server. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::GameId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "game not found: 4f1c9e",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 5xx                          |
#[derive(Debug, thiserror::Error)]
pub enum LivefeedError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A hand could not be parsed as rock, paper or scissors.
    #[error("invalid play: {0}")]
    InvalidPlay(String),

    /// No live game with the given id.
    #[error("game not found: {0}")]
    GameNotFound(GameId),

    /// No player with the given id.
    #[error("player not found: {0}")]
    PlayerNotFound(uuid::Uuid),

    /// A game with the same id is already live.
    #[error("game already live: {0}")]
    DuplicateGame(GameId),

    /// A history sync is already running.
    #[error("history sync already in progress")]
    SyncInProgress,

    /// The operation needs the results database, which is switched off.
    #[error("persistence is disabled")]
    PersistenceDisabled,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// The upstream game API failed or returned something unexpected.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LivefeedError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidPlay(_) => 1002,
            Self::GameNotFound(_) => 2001,
            Self::PlayerNotFound(_) => 2002,
            Self::DuplicateGame(_) => 2003,
            Self::SyncInProgress => 2004,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::PersistenceDisabled => 3002,
            Self::Upstream(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidPlay(_) => StatusCode::BAD_REQUEST,
            Self::GameNotFound(_) | Self::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateGame(_) | Self::SyncInProgress => StatusCode::CONFLICT,
            Self::PersistenceDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for LivefeedError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for LivefeedError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<reqwest::Error> for LivefeedError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl IntoResponse for LivefeedError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
