/// Shared application state
use crate::services::EventLog;
use chorus_playback::SessionManager;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub event_log: EventLog,
}

impl AppState {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self {
            sessions,
            event_log: EventLog::new(),
        }
    }
}
