//! Representations of cadence's tracks and playback modes, as well as a way to
//! retrieve tracks from YouTube.
//!
//! Separated out to allow for use in other utilities.
#![deny(missing_docs)]

use std::collections::HashMap;

pub use cadence_youtube as yt;

mod track;
pub use track::{Track, TrackId};

mod repeat_mode;
pub use repeat_mode::RepeatMode;

mod title;
pub use title::clean_title;

/// Searches for tracks, dropping any result without a known, positive duration
/// (channels, playlists, live streams).
///
/// The durations are fetched with a single batched `videos` request.
pub async fn search(
    client: &yt::Client,
    request: &yt::SearchRequest,
) -> yt::ClientResult<Vec<Track>> {
    let response = client.search(request).await?;

    let video_ids: Vec<String> = response
        .items
        .iter()
        .filter_map(|item| item.id.video_id.clone())
        .collect();
    let durations: HashMap<String, u32> = client
        .get_video_details(&video_ids)
        .await?
        .items
        .into_iter()
        .map(|video| {
            let duration = video
                .content_details
                .as_ref()
                .map(|details| details.duration_seconds())
                .unwrap_or(0);
            (video.id, duration)
        })
        .collect();

    Ok(tracks_from_search_results(response.items, &durations))
}

/// Fetches the currently trending music videos for a region.
pub async fn trending(
    client: &yt::Client,
    region_code: &str,
    limit: u32,
) -> yt::ClientResult<Vec<Track>> {
    Ok(client
        .get_most_popular_music(region_code, limit)
        .await?
        .items
        .into_iter()
        .filter_map(Track::from_video)
        .collect())
}

fn tracks_from_search_results(
    results: Vec<yt::SearchResult>,
    durations: &HashMap<String, u32>,
) -> Vec<Track> {
    results
        .into_iter()
        .filter_map(|result| {
            let duration = result
                .id
                .video_id
                .as_ref()
                .and_then(|id| durations.get(id))
                .copied()
                .unwrap_or(0);
            Track::from_search_result(result, duration)
        })
        .filter(Track::is_playable)
        .collect()
}
