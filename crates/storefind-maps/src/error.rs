use thiserror::Error;

/// Errors returned by the maps proxy client.
#[derive(Debug, Error)]
pub enum MapsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy returned a non-OK `status` with a message.
    #[error("maps API error: {0}")]
    ApiError(String),

    /// The proxy reported `OVER_QUERY_LIMIT`; callers must stop, not retry.
    #[error("maps API quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
