//! Error types for Gmail API operations.

/// Result type alias for Gmail API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Gmail API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The access token was rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success response from the API.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response envelope, or the raw body.
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `raw` message payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] mailsift_mime::Error),

    /// A `format=raw` response without a `raw` field.
    #[error("Message {0} has no raw payload")]
    MissingRaw(String),
}
