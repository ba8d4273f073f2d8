/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable audio item
///
/// Produced by a [`TrackResolver`](crate::TrackResolver) and never mutated
/// afterwards. Cloning is cheap enough that queues hold tracks by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Where the audio lives (page URL, stream URL, file path...)
    pub source_locator: String,

    /// Expected length, if known (live streams have none)
    pub duration_estimate: Option<Duration>,
}

impl Track {
    /// Create a new track with a generated id and unknown duration
    pub fn new(title: impl Into<String>, source_locator: impl Into<String>) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.into(),
            source_locator: source_locator.into(),
            duration_estimate: None,
        }
    }

    /// Replace the generated id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<TrackId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the expected duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_estimate = Some(duration);
        self
    }
}
