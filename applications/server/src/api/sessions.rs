/// Session control API routes
use crate::{
    command,
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chorus_core::SessionKey;
use chorus_playback::{Ack, Command, Outcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AckResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub warnings: Vec<String>,
}

impl From<Ack> for AckResponse {
    fn from(ack: Ack) -> Self {
        Self {
            outcome: ack.outcome,
            warnings: ack.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionKey>,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub text: String,
}

/// Submit a command, starting the event log for sessions it creates
async fn dispatch(app_state: &AppState, key: &SessionKey, command: Command) -> Result<AckResponse> {
    let joining = matches!(command, Command::Join);
    let ack = app_state.sessions.submit(key, command).await?;

    if joining {
        let session = app_state.sessions.get(key).await?;
        if app_state.event_log.watch(&session).await {
            tracing::info!("Session {} joined", key);
        }
    }

    Ok(ack.into())
}

/// GET /api/sessions - List active sessions
pub async fn list_sessions(State(app_state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: app_state.sessions.sessions().await,
    })
}

/// POST /api/sessions/:key/join - Create the session (idempotent)
pub async fn join(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    Ok(Json(dispatch(&app_state, &key.into(), Command::Join).await?))
}

/// POST /api/sessions/:key/leave - Tear the session down
pub async fn leave(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    Ok(Json(dispatch(&app_state, &key.into(), Command::Leave).await?))
}

/// POST /api/sessions/:key/play - Resolve a query and queue it
pub async fn play(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<AckResponse>> {
    let query = req.query.trim();
    if query.is_empty() {
        return Err(ServerError::BadRequest("query must not be empty".to_string()));
    }

    Ok(Json(
        dispatch(&app_state, &key.into(), Command::Play(query.to_string())).await?,
    ))
}

/// POST /api/sessions/:key/pause - Pause playback
pub async fn pause(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    Ok(Json(dispatch(&app_state, &key.into(), Command::Pause).await?))
}

/// POST /api/sessions/:key/resume - Resume playback
pub async fn resume(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    Ok(Json(dispatch(&app_state, &key.into(), Command::Resume).await?))
}

/// POST /api/sessions/:key/skip - Skip to the next track
pub async fn skip(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    Ok(Json(dispatch(&app_state, &key.into(), Command::Skip).await?))
}

/// POST /api/sessions/:key/previous - Go back to the previous track
pub async fn previous(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    Ok(Json(dispatch(&app_state, &key.into(), Command::Previous).await?))
}

/// GET /api/sessions/:key/queue - Current and pending tracks
pub async fn queue(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    Ok(Json(dispatch(&app_state, &key.into(), Command::ListQueue).await?))
}

/// POST /api/sessions/:key/command - Run a `!`-prefixed chat command
pub async fn chat_command(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<CommandRequest>,
) -> Result<Json<AckResponse>> {
    let command = command::parse(&req.text).map_err(|e| ServerError::BadRequest(e.to_string()))?;
    tracing::debug!("Chat command for {}: {}", key, command.name());

    Ok(Json(dispatch(&app_state, &key.into(), command).await?))
}
