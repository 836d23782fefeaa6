//! A barebones client for the YouTube Data API v3, along with audio stream
//! resolution through a Piped-compatible extraction API.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod duration;
pub use duration::parse_iso8601_duration;

mod search;
pub use search::*;

mod video;
pub use video::*;

mod video_id;
pub use video_id::*;

mod stream;
pub use stream::*;

mod request;
