/// Playback state of a voice session
use serde::{Deserialize, Serialize};

/// Playback state
///
/// Exactly one per session. `Stopped` is terminal: the session has been torn
/// down and accepts no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing is streaming
    #[default]
    Idle,

    /// A track is streaming
    Playing,

    /// A track is loaded but paused
    Paused,

    /// Session torn down
    Stopped,
}

impl PlaybackState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }

    /// Whether a track is loaded in the sink (playing or paused)
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
