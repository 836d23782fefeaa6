use serde::{Deserialize, Serialize};

use crate::{clean_title, yt};

/// A track ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub String);
impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A track, as `cadence` cares about it.
///
/// Tracks are values: changing one (e.g. binding a resolved stream) produces a new track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// The track ID, unique within a session
    pub id: TrackId,
    /// The track title
    pub title: String,
    /// The track artist
    pub artist: String,
    /// The album, if known
    pub album: Option<String>,
    /// The duration in seconds; 0 if unknown
    pub duration: u32,
    /// The thumbnail URL
    pub thumbnail: String,
    /// The playable source URL
    pub url: String,
    /// The ID of the video this track comes from
    pub video_id: String,
}
impl Track {
    /// Builds a track from a search result. Returns `None` for anything that is not a video.
    pub fn from_search_result(result: yt::SearchResult, duration: u32) -> Option<Self> {
        let video_id = result.id.video_id?;
        Some(Self::from_parts(video_id, &result.snippet, duration))
    }

    /// Builds a track from a video resource. Returns `None` if the snippet was not requested.
    pub fn from_video(video: yt::Video) -> Option<Self> {
        let duration = video
            .content_details
            .as_ref()
            .map(|details| details.duration_seconds())
            .unwrap_or(0);
        let snippet = video.snippet.as_ref()?;
        Some(Self::from_parts(video.id.clone(), snippet, duration))
    }

    fn from_parts(video_id: String, snippet: &yt::Snippet, duration: u32) -> Self {
        Track {
            id: TrackId(video_id.clone()),
            title: clean_title(&snippet.title),
            artist: snippet.channel_title.clone(),
            album: None,
            duration,
            thumbnail: snippet.thumbnails.best().unwrap_or_default().to_string(),
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            video_id,
        }
    }

    /// Whether the track has a known duration. Tracks without one are not offered for playback.
    pub fn is_playable(&self) -> bool {
        self.duration > 0
    }

    /// A copy of this track with a different source URL.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Track {
            url: url.into(),
            ..self.clone()
        }
    }

    /// A copy of this track that plays from a resolved stream, filling in anything the
    /// stream knows that the track did not.
    pub fn with_stream(&self, stream: &yt::ResolvedStream) -> Self {
        let mut track = self.with_url(&stream.stream_url);
        if track.duration == 0 {
            track.duration = u32::try_from(stream.details.length_seconds).unwrap_or(u32::MAX);
        }
        if track.thumbnail.is_empty()
            && let Some(thumbnail) = &stream.details.thumbnail
        {
            track.thumbnail = thumbnail.clone();
        }
        track
    }
}
