/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chorus_core::PlaybackError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Playback(err) => match err {
                PlaybackError::SessionNotFound(_) => StatusCode::NOT_FOUND,
                PlaybackError::InvalidTransition { .. } => StatusCode::CONFLICT,
                PlaybackError::SessionStopped(_) => StatusCode::GONE,
                PlaybackError::ResolveFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PlaybackError::SinkFailure(_) => StatusCode::BAD_GATEWAY,
            },
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ServerError::Playback(ref err) => {
                if matches!(err, PlaybackError::SinkFailure(_)) {
                    tracing::warn!("Sink error: {}", err);
                }
                err.to_string()
            }
            ServerError::BadRequest(msg) => msg,
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
