use serde::{Deserialize, de::DeserializeOwned};

use crate::{Client, ClientError, ClientResult};

/// Making requests to the YouTube Data API.
impl Client {
    /// Make a request to the Data API. `T` is the list response for the endpoint:
    /// for `search`, `T` should be [`crate::SearchListResponse`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not valid.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<T> {
        let bytes = self.request_raw(endpoint, parameters).await?;
        Self::parse_response::<T>(&bytes)
    }

    pub(crate) async fn request_raw(
        &self,
        endpoint: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<Vec<u8>> {
        let request = self
            .client
            .get(format!("{}/{endpoint}", self.data_api_url))
            .query(&[("key", self.api_key.clone())])
            .query(parameters);

        Ok(request.send().await?.bytes().await?.into())
    }

    pub(crate) fn parse_response<T: DeserializeOwned>(bytes: &[u8]) -> ClientResult<T> {
        // Error responses carry a top-level `error` object in place of the body.
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(bytes) {
            return Err(ClientError::ApiError {
                code: envelope.error.code,
                message: envelope.error.message,
            });
        }

        Ok(serde_json::from_slice(bytes)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ResponseError,
}

#[derive(Debug, Clone, Deserialize)]
/// An error that occurred when making a request.
struct ResponseError {
    /// The error code.
    code: u16,
    /// The error message.
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VideoListResponse;

    #[test]
    fn api_errors_are_surfaced() {
        let body = br#"{"error":{"code":403,"message":"quotaExceeded","errors":[]}}"#;
        match Client::parse_response::<VideoListResponse>(body) {
            Err(ClientError::ApiError { code, message }) => {
                assert_eq!(code, 403);
                assert_eq!(message.as_deref(), Some("quotaExceeded"));
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_deserialization_error() {
        let result = Client::parse_response::<VideoListResponse>(b"<html>");
        assert!(matches!(result, Err(ClientError::DeserializationError(_))));
    }
}
