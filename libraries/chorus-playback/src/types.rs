//! Command, acknowledgement and configuration types

use crate::queue::QueueSnapshot;
use chorus_core::{PlaybackError, PlaybackState, Track};
use serde::{Deserialize, Serialize};

/// Command accepted by [`SessionManager::submit`](crate::SessionManager::submit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "query", rename_all = "snake_case")]
pub enum Command {
    /// Create the session (idempotent)
    Join,

    /// Tear the session down
    Leave,

    /// Resolve a query and queue the result
    Play(String),

    /// Pause the current track
    Pause,

    /// Resume a paused track
    Resume,

    /// Skip to the next pending track
    Skip,

    /// Go back to the last played track
    Previous,

    /// List current and pending tracks
    ListQueue,
}

impl Command {
    /// Short command name, used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Play(_) => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Skip => "skip",
            Self::Previous => "previous",
            Self::ListQueue => "queue",
        }
    }
}

/// Command processed by a session worker
///
/// `Play` arrives here already resolved; `Join`, `Leave` and `ListQueue` never
/// go through the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Queue a resolved track
    Enqueue(Track),
    /// Pause the current track
    Pause,
    /// Resume a paused track
    Resume,
    /// Skip to the next pending track
    Skip,
    /// Go back to the last played track
    Previous,
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Session exists (new or already joined)
    Joined,

    /// Session torn down
    Left,

    /// Track added; `started` is true if it began playing right away
    Queued {
        /// The queued track
        track: Track,
        /// Whether playback started because the session was idle
        started: bool,
    },

    /// Playback paused
    Paused,

    /// Playback resumed
    Resumed,

    /// Moved to the next track (`None` when the queue ran out)
    Skipped {
        /// Track now playing
        now_playing: Option<Track>,
    },

    /// Moved back to the previous track
    Previous {
        /// Track now playing
        now_playing: Option<Track>,
    },

    /// `previous` with nothing in history: nothing changed
    NoPrevious,

    /// Queue listing
    Queue(QueueSnapshot),
}

/// Successful command result
///
/// `warnings` holds recovered failures, e.g. tracks that failed to resolve and
/// were skipped while the command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// What happened
    pub outcome: Outcome,

    /// Non-fatal failures met along the way
    pub warnings: Vec<PlaybackError>,
}

impl Ack {
    /// Acknowledge without warnings
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            warnings: Vec::new(),
        }
    }

    /// Attach warnings
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<PlaybackError>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Status published by a session worker after every message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    /// Current playback state
    pub state: PlaybackState,

    /// Current and pending tracks
    pub queue: QueueSnapshot,

    /// Number of history entries available to `previous`
    pub history_len: usize,

    /// Playback epoch of the current stream
    pub epoch: u64,
}

/// Configuration for playback sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Extra tracks tried after a track fails to start (default: 3)
    pub resolve_retry_limit: usize,

    /// Capacity of each session's event channel (default: 64)
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            resolve_retry_limit: 3,
            event_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.resolve_retry_limit, 3);
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{"resolve_retry_limit": 5}"#).unwrap();
        assert_eq!(config.resolve_retry_limit, 5);
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn command_json_shape() {
        let json = serde_json::to_string(&Command::Play("lofi".into())).unwrap();
        assert_eq!(json, r#"{"command":"play","query":"lofi"}"#);

        let skip: Command = serde_json::from_str(r#"{"command":"skip"}"#).unwrap();
        assert_eq!(skip, Command::Skip);
        assert_eq!(Command::ListQueue.name(), "queue");
    }

    #[test]
    fn ack_carries_warnings() {
        let ack = Ack::new(Outcome::Paused)
            .with_warnings(vec![PlaybackError::ResolveFailure("gone".into())]);
        assert_eq!(ack.outcome, Outcome::Paused);
        assert_eq!(ack.warnings.len(), 1);
    }
}
