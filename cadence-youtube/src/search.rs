use serde::{Deserialize, Serialize};

use crate::{Client, ClientResult, Snippet};

/// The kind of resource a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Videos.
    #[default]
    Video,
    /// Playlists.
    Playlist,
    /// Channels.
    Channel,
}
impl SearchKind {
    /// The value the API expects for the `type` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Video => "video",
            SearchKind::Playlist => "playlist",
            SearchKind::Channel => "channel",
        }
    }
}
impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl std::str::FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(SearchKind::Video),
            "playlist" => Ok(SearchKind::Playlist),
            "channel" => Ok(SearchKind::Channel),
            other => Err(format!(
                "unknown search kind `{other}` (expected video, playlist or channel)"
            )),
        }
    }
}

/// A request to the `search` endpoint.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// The search query.
    pub query: String,
    /// The kind of resource to return.
    pub kind: SearchKind,
    /// The maximum number of results to return (the API caps this at 50).
    pub max_results: Option<u32>,
}

/// The identifier of a search result; which field is set depends on `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    /// The resource type, e.g. `youtube#video`
    pub kind: String,
    /// Set for video results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Set for playlist results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    /// Set for channel results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

/// A single search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The resource identifier
    pub id: ResourceId,
    /// The snippet
    pub snippet: Snippet,
}

/// A response from the `search` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    /// The results found.
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

/// Search-related functionality.
impl Client {
    /// Search for videos, playlists or channels.
    pub async fn search(&self, request: &SearchRequest) -> ClientResult<SearchListResponse> {
        let mut parameters = vec![
            ("part", "snippet".to_string()),
            ("q", request.query.clone()),
            ("type", request.kind.as_str().to_string()),
        ];
        if let Some(max_results) = request.max_results {
            parameters.push(("maxResults", Self::page_size(max_results).to_string()));
        }
        // These filters are only accepted alongside `type=video`.
        if request.kind == SearchKind::Video {
            parameters.push(("videoDefinition", "any".to_string()));
            parameters.push(("videoCategoryId", Self::MUSIC_CATEGORY_ID.to_string()));
        }

        self.request::<SearchListResponse>("search", &parameters)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_response() {
        let body = r#"{
            "items": [
                {
                    "id": { "kind": "youtube#video", "videoId": "kJQP7kiw5Fk" },
                    "snippet": {
                        "title": "Luis Fonsi - Despacito ft. Daddy Yankee",
                        "channelTitle": "LuisFonsiVEVO",
                        "description": "",
                        "thumbnails": { "high": { "url": "https://i.ytimg.com/vi/kJQP7kiw5Fk/hqdefault.jpg" } }
                    }
                },
                {
                    "id": { "kind": "youtube#channel", "channelId": "UCxoq-PAQeAdk_zyg8YS0JqA" },
                    "snippet": { "title": "Luis Fonsi", "channelTitle": "Luis Fonsi" }
                }
            ]
        }"#;

        let response: SearchListResponse = Client::parse_response(body.as_bytes()).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].id.video_id.as_deref(), Some("kJQP7kiw5Fk"));
        assert_eq!(response.items[1].id.video_id, None);
        assert_eq!(
            response.items[1].id.channel_id.as_deref(),
            Some("UCxoq-PAQeAdk_zyg8YS0JqA")
        );
    }

    #[test]
    fn search_kind_round_trips_through_strings() {
        for kind in [SearchKind::Video, SearchKind::Playlist, SearchKind::Channel] {
            assert_eq!(kind.as_str().parse::<SearchKind>(), Ok(kind));
        }
        assert_eq!("Video".parse::<SearchKind>(), Ok(SearchKind::Video));
        assert!("album".parse::<SearchKind>().is_err());
    }
}
