//! Playback queue
//!
//! Pending tracks, played history and the current track of one session.
//!
//! ```text
//! History (most recent last):  A  B
//! ─────────────────────────────────
//! Current:                     C
//! ─────────────────────────────────
//! Pending (next to play first): D  E  F
//! ```
//!
//! The current track is never in `pending` or `history` at the same time.

use crate::history::History;
use chorus_core::Track;
use serde::Serialize;
use std::collections::VecDeque;

/// Read-only view used for queue listings (history is not included)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    /// Track currently loaded in the sink
    pub current: Option<Track>,

    /// Upcoming tracks, next first
    pub pending: Vec<Track>,
}

impl QueueSnapshot {
    /// Total tracks shown (current + pending)
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    /// Whether nothing is playing or queued
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }
}

/// Per-session playback queue
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Upcoming tracks (front = next)
    pending: VecDeque<Track>,

    /// Track moved out of `pending` and handed to the sink
    current: Option<Track>,

    /// Previously played tracks
    history: History,
}

impl Queue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track to the end of the pending list
    pub fn enqueue(&mut self, track: Track) {
        self.pending.push_back(track);
    }

    /// Next track to play, without removing it
    pub fn peek_next(&self) -> Option<&Track> {
        self.pending.front()
    }

    /// Move forward one track
    ///
    /// The current track (if any) is retired to history, then the front of
    /// `pending` becomes current. Returns the new current track, or `None`
    /// when nothing was pending.
    pub fn advance_forward(&mut self) -> Option<Track> {
        if let Some(track) = self.current.take() {
            self.history.push(track);
        }
        self.current = self.pending.pop_front();
        self.current.clone()
    }

    /// Move back one track
    ///
    /// Returns `None` and changes nothing when history is empty. Otherwise the
    /// current track (if any) goes back to the front of `pending` so the
    /// upcoming order is preserved, and the most recent history entry becomes
    /// current.
    pub fn advance_backward(&mut self) -> Option<Track> {
        let previous = self.history.pop()?;
        if let Some(track) = self.current.take() {
            self.pending.push_front(track);
        }
        self.current = Some(previous);
        self.current.clone()
    }

    /// Drop the current track without recording it in history
    ///
    /// Used when a track could not be started: it never played.
    pub fn discard_current(&mut self) -> Option<Track> {
        self.current.take()
    }

    /// Track currently loaded
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Read-only view for listings
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            current: self.current.clone(),
            pending: self.pending.iter().cloned().collect(),
        }
    }

    /// Iterate pending tracks (next first)
    pub fn pending(&self) -> impl Iterator<Item = &Track> {
        self.pending.iter()
    }

    /// Iterate history (oldest first)
    pub fn history(&self) -> impl Iterator<Item = &Track> {
        self.history.iter()
    }

    /// Number of pending tracks
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of history entries
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether `advance_backward` would do anything
    pub fn has_previous(&self) -> bool {
        !self.history.is_empty()
    }

    /// Remove everything: pending, current and history
    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
        self.history.clear();
    }
}
