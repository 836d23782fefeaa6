use serde::{Deserialize, Serialize};

use crate::{Queue, RepeatMode, Track};

/// Everything the player knows about what is playing.
///
/// There is one session per engine; consumers read snapshots of it through
/// [`PlaybackEngine::subscribe`](crate::PlaybackEngine::subscribe).
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// The track bound to the audio primitive. Not necessarily in the queue.
    pub current_track: Option<Track>,
    pub transport: TransportState,
    /// Position in seconds, as last reported by the primitive (or provisionally by a seek).
    pub current_time: f64,
    /// Length in seconds; 0 until the primitive has loaded metadata.
    pub duration: f64,
    /// Stored volume in `[0, 1]`. Muting does not change it.
    pub volume: f32,
    pub is_muted: bool,
    pub queue: Queue,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
    /// The most recent playback failure, cleared by the next successful start.
    pub last_error: Option<PlaybackError>,
}
impl PlaybackSession {
    pub const DEFAULT_VOLUME: f32 = 0.7;

    /// The volume the primitive should actually be at.
    pub fn effective_volume(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.volume }
    }

    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }
}
impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            current_track: None,
            transport: TransportState::Paused,
            current_time: 0.0,
            duration: 0.0,
            volume: Self::DEFAULT_VOLUME,
            is_muted: false,
            queue: Queue::default(),
            is_shuffled: false,
            repeat_mode: RepeatMode::Off,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransportState {
    Playing,
    /// Also the state when nothing is loaded.
    #[default]
    Paused,
}
impl TransportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
        }
    }
}
impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackError {
    /// Play was requested with nothing to play.
    NoSource,
    /// The primitive refused to start, e.g. no output device.
    StartFailed(String),
    /// The source could not be fetched.
    LoadFailed(String),
    /// The source was fetched but could not be decoded.
    DecodeFailed(String),
}
impl PlaybackError {
    /// Should be paired with [`Self::display_message`]
    pub fn display_name(&self) -> &'static str {
        match self {
            PlaybackError::NoSource => "Nothing to play",
            PlaybackError::StartFailed(_) => "Failed to start playback",
            PlaybackError::LoadFailed(_) => "Failed to load track",
            PlaybackError::DecodeFailed(_) => "Failed to decode track",
        }
    }

    /// Should be paired with [`Self::display_name`]
    pub fn display_message(&self) -> &str {
        match self {
            PlaybackError::NoSource => "no source has been loaded",
            PlaybackError::StartFailed(error)
            | PlaybackError::LoadFailed(error)
            | PlaybackError::DecodeFailed(error) => error,
        }
    }
}
impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.display_name(), self.display_message())
    }
}
impl std::error::Error for PlaybackError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sessions_are_idle() {
        let session = PlaybackSession::default();
        assert_eq!(session.current_track, None);
        assert_eq!(session.transport, TransportState::Paused);
        assert_eq!(session.volume, 0.7);
        assert_eq!(session.repeat_mode, RepeatMode::Off);
        assert!(!session.is_shuffled);
        assert!(session.queue.is_empty());
    }

    #[test]
    fn muting_zeroes_effective_volume_only() {
        let session = PlaybackSession {
            is_muted: true,
            ..Default::default()
        };
        assert_eq!(session.effective_volume(), 0.0);
        assert_eq!(session.volume, 0.7);
    }

    #[test]
    fn errors_display_name_and_message() {
        let error = PlaybackError::DecodeFailed("unsupported codec".to_string());
        assert_eq!(error.to_string(), "Failed to decode track: unsupported codec");
    }
}
