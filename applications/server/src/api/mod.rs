/// API route modules
pub mod health;
pub mod sessions;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// All `/api` routes
pub fn router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/:key/join", post(sessions::join))
        .route("/sessions/:key/leave", post(sessions::leave))
        .route("/sessions/:key/play", post(sessions::play))
        .route("/sessions/:key/pause", post(sessions::pause))
        .route("/sessions/:key/resume", post(sessions::resume))
        .route("/sessions/:key/skip", post(sessions::skip))
        .route("/sessions/:key/previous", post(sessions::previous))
        .route("/sessions/:key/queue", get(sessions::queue))
        .route("/sessions/:key/command", post(sessions::chat_command));

    Router::new().nest("/api", routes).with_state(app_state)
}
