//! Chorus Server Library
//!
//! HTTP command routing for Chorus playback sessions, plus the concrete
//! collaborators the server runs with: a yt-dlp track resolver and a headless
//! clock sink.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{ClockSink, EventLog, YtDlpResolver};
pub use state::AppState;
