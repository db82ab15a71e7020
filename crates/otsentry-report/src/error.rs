/// Errors that can occur while persisting or loading a threat report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Filesystem error while reading or writing the report file.
    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failure.
    #[error("Report JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, ReportError>;
