/// Core error types for Chorus
use crate::types::{PlaybackState, SessionKey};
use thiserror::Error;

/// Result type alias using `PlaybackError`
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Error returned to the originator of a playback command
///
/// Every variant leaves the session's queue and state well-defined; none of
/// them is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The query (or a queued track's stream) could not be resolved
    #[error("Could not resolve track: {0}")]
    ResolveFailure(String),

    /// The audio sink failed to start or lost the stream
    #[error("Audio sink failure: {0}")]
    SinkFailure(String),

    /// The command is not valid in the current playback state
    #[error("Cannot {command} while {state}")]
    InvalidTransition {
        /// Rejected command name
        command: &'static str,
        /// State the session was in
        state: PlaybackState,
    },

    /// No session is active for this key
    #[error("No active session: {0}")]
    SessionNotFound(SessionKey),

    /// The session was torn down before the command could run
    #[error("Session stopped: {0}")]
    SessionStopped(SessionKey),
}

impl PlaybackError {
    /// Create an invalid transition error
    pub fn invalid_transition(command: &'static str, state: PlaybackState) -> Self {
        Self::InvalidTransition { command, state }
    }

    /// Whether the command was merely rejected (nothing changed)
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

/// Track resolver errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing matched the query
    #[error("No match for {0:?}")]
    NoMatch(String),

    /// The resolver backend failed (process, network, parse)
    #[error("Resolver backend error: {0}")]
    Backend(String),
}

impl ResolveError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Audio sink errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The stream could not be opened or broke while playing
    #[error("Stream error: {0}")]
    Stream(String),

    /// The handle does not refer to a live stream
    #[error("Unknown sink handle: {0}")]
    UnknownHandle(u64),
}

impl SinkError {
    /// Create a stream error
    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }
}

impl From<ResolveError> for PlaybackError {
    fn from(err: ResolveError) -> Self {
        Self::ResolveFailure(err.to_string())
    }
}

impl From<SinkError> for PlaybackError {
    fn from(err: SinkError) -> Self {
        Self::SinkFailure(err.to_string())
    }
}
