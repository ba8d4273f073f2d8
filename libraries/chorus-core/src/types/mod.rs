mod ids;
mod playback_state;
mod track;

pub use ids::{SessionKey, TrackId};
pub use playback_state::PlaybackState;
pub use track::Track;
