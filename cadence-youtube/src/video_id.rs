/// A validated YouTube video ID: exactly 11 characters from `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoId(String);
impl VideoId {
    /// The length of every video ID.
    pub const LEN: usize = 11;

    /// Validate `id` as a video ID.
    pub fn parse(id: &str) -> Result<Self, InvalidVideoId> {
        let valid = id.len() == Self::LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(InvalidVideoId(id.to_string()))
        }
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The public watch page for the video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}
impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::str::FromStr for VideoId {
    type Err = InvalidVideoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The error returned when a string is not a valid [`VideoId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVideoId(pub String);
impl std::fmt::Display for InvalidVideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid video ID format: {:?}", self.0)
    }
}
impl std::error::Error for InvalidVideoId {}
