//! Chorus Core
//!
//! Domain types, collaborator traits and error handling shared by the Chorus
//! playback library and the server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `SessionKey`, `PlaybackState`
//! - **Collaborator Traits**: `TrackResolver`, `AudioSink` (plus the
//!   `SinkNotifier` a sink uses to report the end of a stream)
//! - **Error Handling**: `PlaybackError` and the collaborator-level
//!   `ResolveError`/`SinkError`
//!
//! # Example
//!
//! ```rust
//! use chorus_core::{Track, SessionKey, PlaybackState};
//! use std::time::Duration;
//!
//! let key = SessionKey::new("guild-1");
//! let track = Track::new("My Favorite Song", "https://example.com/watch?v=1")
//!     .with_duration(Duration::from_secs(200));
//!
//! assert_eq!(PlaybackState::default(), PlaybackState::Idle);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PlaybackError, ResolveError, Result, SinkError};
pub use traits::{AudioSink, SinkHandle, SinkNotifier, SinkOutcome, SinkSignal, TrackResolver};
pub use types::{PlaybackState, SessionKey, Track, TrackId};
