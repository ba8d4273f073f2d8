//! Playback history tracking
//!
//! Keeps every track that finished or was skipped, for "previous" navigation

use chorus_core::Track;
use std::collections::VecDeque;

/// Played tracks, most recent last
///
/// Nothing is ever evicted: a track leaves history only through `pop`
/// or `clear`, so forward and backward moves never lose a track.
#[derive(Debug, Clone, Default)]
pub struct History {
    tracks: VecDeque<Track>,
}

impl History {
    /// Create empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a played track
    pub fn push(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Pop most recent track from history
    pub fn pop(&mut self) -> Option<Track> {
        self.tracks.pop_back()
    }

    /// Iterate history tracks (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
