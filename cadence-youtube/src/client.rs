#[derive(Debug)]
/// An error that can occur when interacting with the client.
pub enum ClientError {
    /// An error that occurred when making a request.
    ReqwestError(reqwest::Error),
    /// An error that occurred when deserializing a response.
    DeserializationError(serde_json::Error),
    /// The Data API returned an error.
    ApiError {
        /// The HTTP-style error code.
        code: u16,
        /// The error message.
        message: Option<String>,
    },
}
impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ReqwestError(e) => write!(f, "Reqwest error: {e}"),
            ClientError::DeserializationError(e) => write!(f, "Deserialization error: {e}"),
            ClientError::ApiError { code, message } => {
                write!(f, "YouTube API error: {code}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
        }
    }
}
impl std::error::Error for ClientError {}
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ReqwestError(e)
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::DeserializationError(e)
    }
}
/// A result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// A client for the YouTube Data API and a stream extraction service.
pub struct Client {
    pub(crate) api_key: String,
    pub(crate) data_api_url: String,
    pub(crate) stream_base_url: String,
    pub(crate) client: reqwest::Client,
}
impl Client {
    /// The base URL of the YouTube Data API v3.
    pub const DATA_API_URL: &str = "https://www.googleapis.com/youtube/v3";
    /// The video category ID that YouTube uses for music.
    pub const MUSIC_CATEGORY_ID: &str = "10";
    /// The most results a single Data API page can hold.
    pub const MAX_RESULTS_PER_PAGE: u32 = 50;

    /// Clamps a requested result count to what one page can return.
    pub(crate) fn page_size(max_results: u32) -> u32 {
        max_results.clamp(1, Self::MAX_RESULTS_PER_PAGE)
    }

    /// Create a new client.
    ///
    /// `stream_base_url` is the root of a Piped-compatible API, used for
    /// [`Client::resolve_stream`].
    pub fn new(api_key: impl Into<String>, stream_base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            data_api_url: Self::DATA_API_URL.to_string(),
            stream_base_url: stream_base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the Data API requests at a different base URL.
    pub fn with_data_api_url(mut self, data_api_url: impl Into<String>) -> Self {
        self.data_api_url = data_api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
