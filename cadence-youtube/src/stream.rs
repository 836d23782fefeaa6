use serde::{Deserialize, Serialize};

use crate::{Client, VideoId};

/// Why a stream could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The identifier is not an 11-character video ID. No request was made.
    InvalidIdentifierFormat,
    /// The video does not exist or is unavailable.
    NotFound,
    /// The video is private.
    Forbidden,
    /// The video has no audio-only stream.
    NoAudioAvailable,
    /// The extraction service could not be reached or failed.
    ServiceUnavailable {
        /// What went wrong, for diagnostics.
        reason: String,
    },
}
impl StreamError {
    /// A stable, machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            StreamError::InvalidIdentifierFormat => "invalid_identifier_format",
            StreamError::NotFound => "not_found",
            StreamError::Forbidden => "forbidden",
            StreamError::NoAudioAvailable => "no_audio_available",
            StreamError::ServiceUnavailable { .. } => "service_unavailable",
        }
    }
}
impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::InvalidIdentifierFormat => write!(f, "Invalid video ID format"),
            StreamError::NotFound => write!(f, "Video is unavailable"),
            StreamError::Forbidden => write!(f, "Video is private"),
            StreamError::NoAudioAvailable => write!(f, "No audio stream available"),
            StreamError::ServiceUnavailable { reason } => {
                write!(f, "Audio streaming service unavailable: {reason}")
            }
        }
    }
}
impl std::error::Error for StreamError {}

/// A directly playable audio stream for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStream {
    /// The URL of the audio stream
    pub stream_url: String,
    /// The audio bitrate in kbps
    pub bitrate_kbps: Option<u32>,
    /// The container format, e.g. `mp4` or `webm`
    pub container: Option<String>,
    /// The size of the stream in bytes
    pub content_length: Option<u64>,
    /// Details of the video the stream belongs to
    pub details: VideoDetails,
}

/// Metadata echoed back alongside a resolved stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    /// The video title
    pub title: String,
    /// The uploader
    pub author: String,
    /// The length of the video in seconds
    pub length_seconds: u64,
    /// A thumbnail for the video
    pub thumbnail: Option<String>,
}

/// Stream resolution.
impl Client {
    /// Resolve the best audio-only stream for a video.
    ///
    /// The ID is validated before any request is made.
    pub async fn resolve_stream(&self, video_id: &str) -> Result<ResolvedStream, StreamError> {
        let video_id =
            VideoId::parse(video_id).map_err(|_| StreamError::InvalidIdentifierFormat)?;

        let unavailable = |e: reqwest::Error| StreamError::ServiceUnavailable {
            reason: e.to_string(),
        };
        let response = self
            .client
            .get(format!("{}/streams/{video_id}", self.stream_base_url))
            .send()
            .await
            .map_err(unavailable)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(unavailable)?;

        Self::parse_stream_response(status, &bytes)
    }

    pub(crate) fn parse_stream_response(
        status: u16,
        bytes: &[u8],
    ) -> Result<ResolvedStream, StreamError> {
        if (200..300).contains(&status)
            && let Ok(streams) = serde_json::from_slice::<PipedStreams>(bytes)
        {
            let audio = pick_audio_stream(&streams.audio_streams)
                .ok_or(StreamError::NoAudioAvailable)?;
            return Ok(ResolvedStream {
                stream_url: audio.url.clone(),
                bitrate_kbps: audio
                    .bitrate
                    .filter(|b| *b > 0)
                    .and_then(|b| u32::try_from(b / 1000).ok()),
                container: audio.container().map(str::to_string),
                // Unknown lengths are reported as -1
                content_length: audio.content_length.and_then(|l| u64::try_from(l).ok()),
                details: VideoDetails {
                    title: streams.title,
                    author: streams.uploader,
                    length_seconds: streams.duration,
                    thumbnail: streams.thumbnail_url,
                },
            });
        }

        let message = serde_json::from_slice::<PipedError>(bytes)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or_default();
        let lowered = message.to_lowercase();

        if lowered.contains("private") || status == 403 {
            Err(StreamError::Forbidden)
        } else if lowered.contains("unavailable")
            || lowered.contains("not available")
            || lowered.contains("does not exist")
            || status == 404
        {
            Err(StreamError::NotFound)
        } else {
            Err(StreamError::ServiceUnavailable {
                reason: if message.is_empty() {
                    format!("unexpected response (status {status})")
                } else {
                    message
                },
            })
        }
    }
}

/// Prefers the first mp4 stream with a known bitrate, as those decode everywhere.
fn pick_audio_stream(streams: &[PipedAudioStream]) -> Option<&PipedAudioStream> {
    let usable = || streams.iter().filter(|s| !s.url.is_empty());
    usable()
        .find(|s| s.container() == Some("mp4") && s.bitrate.is_some_and(|b| b > 0))
        .or_else(|| usable().next())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipedStreams {
    title: String,
    uploader: String,
    #[serde(default)]
    duration: u64,
    thumbnail_url: Option<String>,
    #[serde(default)]
    audio_streams: Vec<PipedAudioStream>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipedAudioStream {
    url: String,
    mime_type: Option<String>,
    bitrate: Option<i64>,
    content_length: Option<i64>,
}
impl PipedAudioStream {
    /// `audio/mp4; codecs="mp4a.40.2"` → `mp4`
    fn container(&self) -> Option<&str> {
        let mime = self.mime_type.as_deref()?;
        let essence = mime.split(';').next()?.trim();
        essence.split_once('/').map(|(_, subtype)| subtype)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PipedError {
    error: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAMS: &str = r#"{
        "title": "Never Gonna Give You Up",
        "uploader": "Rick Astley",
        "duration": 213,
        "thumbnailUrl": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
        "audioStreams": [
            { "url": "https://cdn.example/opus", "mimeType": "audio/webm; codecs=\"opus\"", "bitrate": 160000, "contentLength": 3500000 },
            { "url": "https://cdn.example/m4a-low", "mimeType": "audio/mp4; codecs=\"mp4a.40.5\"", "bitrate": 0 },
            { "url": "https://cdn.example/m4a", "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"", "bitrate": 130000, "contentLength": 3400000 }
        ]
    }"#;

    #[test]
    fn prefers_mp4_with_bitrate() {
        let stream = Client::parse_stream_response(200, STREAMS.as_bytes()).unwrap();
        assert_eq!(stream.stream_url, "https://cdn.example/m4a");
        assert_eq!(stream.bitrate_kbps, Some(130));
        assert_eq!(stream.container.as_deref(), Some("mp4"));
        assert_eq!(stream.content_length, Some(3_400_000));
        assert_eq!(stream.details.title, "Never Gonna Give You Up");
        assert_eq!(stream.details.author, "Rick Astley");
        assert_eq!(stream.details.length_seconds, 213);
    }

    #[test]
    fn falls_back_to_first_audio_stream() {
        let body = r#"{
            "title": "t", "uploader": "u", "duration": 10,
            "audioStreams": [ { "url": "https://cdn.example/opus", "mimeType": "audio/webm; codecs=\"opus\"", "bitrate": 160000 } ]
        }"#;
        let stream = Client::parse_stream_response(200, body.as_bytes()).unwrap();
        assert_eq!(stream.stream_url, "https://cdn.example/opus");
        assert_eq!(stream.container.as_deref(), Some("webm"));
    }

    #[test]
    fn no_audio_streams() {
        let body = r#"{ "title": "t", "uploader": "u", "duration": 10, "audioStreams": [] }"#;
        assert_eq!(
            Client::parse_stream_response(200, body.as_bytes()),
            Err(StreamError::NoAudioAvailable)
        );
    }

    #[test]
    fn classifies_failures() {
        let unavailable = r#"{ "error": "ExtractionException", "message": "Video unavailable" }"#;
        assert_eq!(
            Client::parse_stream_response(500, unavailable.as_bytes()),
            Err(StreamError::NotFound)
        );

        let private = r#"{ "error": "ContentNotAvailableException", "message": "This is a private video" }"#;
        assert_eq!(
            Client::parse_stream_response(500, private.as_bytes()),
            Err(StreamError::Forbidden)
        );

        assert_eq!(
            Client::parse_stream_response(404, b"not json"),
            Err(StreamError::NotFound)
        );

        let err = Client::parse_stream_response(502, b"<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.code(), "service_unavailable");
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_without_a_request() {
        // Nothing listens here; reaching the network would yield ServiceUnavailable.
        let client = Client::new("", "http://127.0.0.1:9");
        assert_eq!(
            client.resolve_stream("dQw4w9WgXc").await,
            Err(StreamError::InvalidIdentifierFormat)
        );
    }
}
