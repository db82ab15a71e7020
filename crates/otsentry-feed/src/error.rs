/// Errors that can occur when talking to the NVD feed or persisting the
/// seen-id cache.
///
/// # Examples
///
/// ```rust
/// use otsentry_feed::error::FeedError;
///
/// let err = FeedError::Http { status: 503, body: "rate limited".to_string() };
/// assert!(err.to_string().contains("503"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP-level error: non-2xx status code from the NVD API.
    #[error("NVD API HTTP error: status={status}, body={body}")]
    Http { status: u16, body: String },

    /// An underlying HTTP transport error from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while reading or writing the cache file.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, FeedError>;
