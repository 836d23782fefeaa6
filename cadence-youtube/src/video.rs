use serde::{Deserialize, Serialize};

use crate::{Client, ClientResult, parse_iso8601_duration};

/// The snippet part of a search result or video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// The title, HTML-escaped by the API
    pub title: String,
    /// The title of the channel that published the resource
    pub channel_title: String,
    /// The description
    #[serde(default)]
    pub description: String,
    /// The available thumbnails
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

/// The thumbnails available for a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    /// The 120x90 thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    /// The 320x180 thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    /// The 480x360 thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
}
impl Thumbnails {
    /// The high quality thumbnail if there is one, the default one otherwise.
    pub fn best(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

/// A single thumbnail image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    /// The image URL
    pub url: String,
    /// The image width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// The image height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// The content details part of a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDetails {
    /// The ISO-8601 duration of the video
    pub duration: String,
}
impl ContentDetails {
    /// The duration in whole seconds; zero if it could not be parsed.
    pub fn duration_seconds(&self) -> u32 {
        parse_iso8601_duration(&self.duration).unwrap_or(0)
    }
}

/// A video resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// The video ID
    pub id: String,
    /// The snippet, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Snippet>,
    /// The content details, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_details: Option<ContentDetails>,
}

/// A response from the `videos` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// The videos found.
    #[serde(default)]
    pub items: Vec<Video>,
}

/// Video-related functionality.
impl Client {
    /// Get the content details (and therefore durations) for up to 50 videos.
    pub async fn get_video_details(&self, ids: &[String]) -> ClientResult<VideoListResponse> {
        if ids.is_empty() {
            return Ok(VideoListResponse { items: vec![] });
        }

        self.request::<VideoListResponse>(
            "videos",
            &[
                ("part", "contentDetails".to_string()),
                ("id", ids.join(",")),
                ("maxResults", ids.len().to_string()),
            ],
        )
        .await
    }

    /// Get the most popular music videos for a region.
    pub async fn get_most_popular_music(
        &self,
        region_code: &str,
        max_results: u32,
    ) -> ClientResult<VideoListResponse> {
        self.request::<VideoListResponse>(
            "videos",
            &most_popular_music_parameters(region_code, max_results),
        )
        .await
    }
}

fn most_popular_music_parameters(
    region_code: &str,
    max_results: u32,
) -> Vec<(&'static str, String)> {
    vec![
        ("part", "snippet,contentDetails".to_string()),
        ("chart", "mostPopular".to_string()),
        ("regionCode", region_code.to_string()),
        ("videoCategoryId", Client::MUSIC_CATEGORY_ID.to_string()),
        ("maxResults", Client::page_size(max_results).to_string()),
    ]
}
