use crate::{Track, yt};

/// Finds tracks and resolves them into something playable.
///
/// Upstream failures never escape: searches degrade to an empty list and stream resolution to a
/// [`yt::StreamError`], both with a warning logged. Only bad user input is an error.
pub struct Catalog {
    client: yt::Client,
    region_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    EmptyQuery,
    InvalidVideoId(yt::InvalidVideoId),
}
impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::EmptyQuery => write!(f, "search query must not be empty"),
            CatalogError::InvalidVideoId(e) => write!(f, "{e}"),
        }
    }
}
impl std::error::Error for CatalogError {}
impl From<yt::InvalidVideoId> for CatalogError {
    fn from(e: yt::InvalidVideoId) -> Self {
        CatalogError::InvalidVideoId(e)
    }
}

impl Catalog {
    pub const DEFAULT_LIMIT: u32 = 20;

    pub fn new(client: yt::Client, region_code: impl Into<String>) -> Self {
        Self {
            client,
            region_code: region_code.into(),
        }
    }

    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    pub async fn search(
        &self,
        query: &str,
        kind: yt::SearchKind,
        limit: u32,
    ) -> Result<Vec<Track>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let request = yt::SearchRequest {
            query: query.to_string(),
            kind,
            max_results: Some(limit),
        };
        match cadence_state::search(&self.client, &request).await {
            Ok(tracks) => {
                tracing::info!("Found {} tracks for {query:?}", tracks.len());
                Ok(tracks)
            }
            Err(e) => {
                tracing::warn!("Search for {query:?} failed: {e}");
                Ok(vec![])
            }
        }
    }

    pub async fn trending(&self, limit: u32) -> Vec<Track> {
        match cadence_state::trending(&self.client, &self.region_code, limit).await {
            Ok(tracks) => {
                tracing::info!(
                    "Fetched {} trending tracks for {}",
                    tracks.len(),
                    self.region_code
                );
                tracks
            }
            Err(e) => {
                tracing::warn!("Fetching trending tracks failed: {e}");
                vec![]
            }
        }
    }

    pub async fn resolve_stream(
        &self,
        video_id: &yt::VideoId,
    ) -> Result<yt::ResolvedStream, yt::StreamError> {
        self.client
            .resolve_stream(video_id.as_str())
            .await
            .inspect_err(|e| tracing::warn!("Resolving stream for {video_id} failed: {e}"))
    }

    /// Resolves `track`'s stream and returns a copy of it that plays from there.
    pub async fn resolve(&self, track: &Track) -> Result<Track, yt::StreamError> {
        let video_id = yt::VideoId::parse(&track.video_id)
            .map_err(|_| yt::StreamError::InvalidIdentifierFormat)?;
        let stream = self.resolve_stream(&video_id).await?;
        Ok(track.with_stream(&stream))
    }
}

/// Accepts a bare video ID or a watch URL (`youtube.com/watch?v=…`, `youtu.be/…`).
pub fn parse_video_id(input: &str) -> Result<yt::VideoId, CatalogError> {
    let input = input.trim();
    let candidate = if let Some((_, query)) = input.split_once("watch?") {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .unwrap_or(query)
    } else if let Some((_, rest)) = input.split_once("youtu.be/") {
        rest.split(['?', '&', '/']).next().unwrap_or(rest)
    } else {
        input
    };
    Ok(yt::VideoId::parse(candidate)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_urls() {
        for input in [
            "dQw4w9WgXcQ",
            "  dQw4w9WgXcQ\n",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ&t=42",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
        ] {
            assert_eq!(parse_video_id(input).unwrap().as_str(), "dQw4w9WgXcQ");
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(
            parse_video_id("dQw4w9WgXc"),
            Err(CatalogError::InvalidVideoId(_))
        ));
        assert!(parse_video_id("https://www.youtube.com/watch?list=PL123").is_err());
    }

    #[tokio::test]
    async fn empty_queries_are_rejected_before_any_request() {
        let catalog = Catalog::new(yt::Client::new("key", "http://127.0.0.1:9"), "US");
        assert_eq!(
            catalog.search("   ", yt::SearchKind::Video, 10).await,
            Err(CatalogError::EmptyQuery)
        );
    }

    #[tokio::test]
    async fn upstream_failures_become_empty_results() {
        // Nothing listens on the discard port
        let client =
            yt::Client::new("key", "http://127.0.0.1:9").with_data_api_url("http://127.0.0.1:9");
        let catalog = Catalog::new(client, "US");
        assert_eq!(
            catalog.search("never gonna", yt::SearchKind::Video, 10).await,
            Ok(vec![])
        );
        assert!(catalog.trending(10).await.is_empty());
    }
}
