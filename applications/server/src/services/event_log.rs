/// Event log - writes each joined session's playback events to the log
use chorus_core::SessionKey;
use chorus_playback::{PlaybackEvent, Session};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, Mutex};

/// Tracks which sessions already have a logging task
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    watched: Arc<Mutex<HashMap<SessionKey, Weak<Session>>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start logging a session's events, unless that session is already logged
    ///
    /// Returns true if a new logging task was spawned.
    pub async fn watch(&self, session: &Arc<Session>) -> bool {
        let mut watched = self.watched.lock().await;
        watched.retain(|_, logged| logged.strong_count() > 0);

        if let Some(existing) = watched.get(session.key()).and_then(Weak::upgrade) {
            if Arc::ptr_eq(&existing, session) {
                return false;
            }
        }

        watched.insert(session.key().clone(), Arc::downgrade(session));
        tokio::spawn(log_events(session.key().clone(), session.subscribe()));
        true
    }
}

async fn log_events(key: SessionKey, mut events: broadcast::Receiver<PlaybackEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                log_event(&key, &event);
                if event.is_terminal() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!("Session {} event log lagged, missed {} events", key, missed);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn log_event(key: &SessionKey, event: &PlaybackEvent) {
    match event {
        PlaybackEvent::StateChanged { state } => {
            tracing::info!("Session {} is now {}", key, state);
        }
        PlaybackEvent::TrackStarted { track, epoch } => {
            tracing::info!("Session {} now playing: {} (epoch {})", key, track.title, epoch);
        }
        PlaybackEvent::TrackFinished { track_id } => {
            tracing::debug!("Session {} finished track {}", key, track_id);
        }
        PlaybackEvent::QueueChanged { pending } => {
            tracing::debug!("Session {} has {} pending tracks", key, pending);
        }
        PlaybackEvent::Warning { error } => {
            tracing::warn!("Session {}: {}", key, error);
        }
        PlaybackEvent::Error { error } => {
            tracing::error!("Session {} stopped playing: {}", key, error);
        }
        PlaybackEvent::SessionClosed => {
            tracing::info!("Session {} closed", key);
        }
    }
}
