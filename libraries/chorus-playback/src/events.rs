//! Playback Events
//!
//! Event-based notification of what a session is doing. Events are emitted at
//! key points:
//! - State changes (play/pause/idle/stop)
//! - Track starts and finishes
//! - Queue changes
//! - Recovered failures (warnings) and unrecovered ones (errors)
//!
//! Events are broadcast; slow subscribers may miss some (lagged receivers).

use chorus_core::{PlaybackError, PlaybackState, Track, TrackId};

/// Events emitted by a playback session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A track started streaming
    TrackStarted {
        /// The track now playing
        track: Track,
        /// Epoch assigned to this stream
        epoch: u64,
    },

    /// A track reached its end (or broke) and was retired to history
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Pending tracks changed
    QueueChanged {
        /// New number of pending tracks
        pending: usize,
    },

    /// A failure was recovered from (track skipped, stream error...)
    Warning {
        /// What went wrong
        error: PlaybackError,
    },

    /// Playback fell back to idle after a failure it could not recover from
    Error {
        /// What went wrong
        error: PlaybackError,
    },

    /// The session was torn down; no further events follow
    SessionClosed,
}

impl PlaybackEvent {
    /// Whether this is the final event of a session
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::SessionClosed)
    }
}
