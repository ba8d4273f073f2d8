//! Chorus - Playback Sessions
//!
//! Per-session playback orchestration for Chorus.
//!
//! This crate provides:
//! - FIFO queue with full play history (skip / previous)
//! - Playback state machine (Idle, Playing, Paused, Stopped)
//! - One serialized worker per session; user commands and sink signals share
//!   its inbox
//! - Epoch tagging so late signals from replaced streams are ignored
//! - Session manager with race-free creation and teardown
//!
//! # Architecture
//!
//! `chorus-playback` knows nothing about any media backend:
//! - Query resolution goes through [`TrackResolver`](chorus_core::TrackResolver)
//! - Audio output goes through [`AudioSink`](chorus_core::AudioSink)
//!
//! ```text
//! submit(key, Command)
//!        │
//!        ▼
//! SessionManager ──► Session inbox ──► PlaybackController ──► AudioSink
//!                          ▲                                      │
//!                          └──────────── SinkSignal ◄─────────────┘
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use chorus_core::{
//!     AudioSink, ResolveError, SessionKey, SinkError, SinkHandle, SinkNotifier, Track,
//!     TrackResolver,
//! };
//! use chorus_playback::{Command, PlaybackConfig, SessionManager};
//! use std::sync::Arc;
//!
//! struct Lookup;
//!
//! #[async_trait]
//! impl TrackResolver for Lookup {
//!     async fn resolve(&self, query: &str) -> Result<Track, ResolveError> {
//!         Ok(Track::new(query, format!("https://example.com/{query}")))
//!     }
//! }
//!
//! struct Speaker;
//!
//! #[async_trait]
//! impl AudioSink for Speaker {
//!     async fn start(
//!         &self,
//!         _session: &SessionKey,
//!         _track: &Track,
//!         notifier: SinkNotifier,
//!     ) -> Result<SinkHandle, SinkError> {
//!         // A real sink keeps the notifier and fires it when the stream ends
//!         notifier.completed();
//!         Ok(SinkHandle::new(1))
//!     }
//!
//!     async fn pause(&self, _handle: SinkHandle) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//!
//!     async fn resume(&self, _handle: SinkHandle) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//!
//!     async fn stop(&self, _handle: SinkHandle) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> chorus_core::Result<()> {
//! let manager = SessionManager::new(PlaybackConfig::default(), Arc::new(Lookup), Arc::new(Speaker));
//! let key = SessionKey::new("guild-1");
//!
//! manager.submit(&key, Command::Join).await?;
//! manager.submit(&key, Command::Play("lofi beats".into())).await?;
//! manager.submit(&key, Command::Pause).await?;
//! manager.submit(&key, Command::Leave).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod controller;
pub mod events;
mod history;
mod manager;
pub mod queue;
mod session;
pub mod types;

// Public exports
pub use controller::{PlaybackController, SignalRoute};
pub use events::PlaybackEvent;
pub use history::History;
pub use manager::SessionManager;
pub use queue::{Queue, QueueSnapshot};
pub use session::Session;
pub use types::{Ack, Command, Outcome, PlaybackConfig, SessionCommand, SessionStatus};
