//! Error types for the proton-link client library.

use thiserror::Error;

/// Result type for proton-link operations.
pub type Result<T> = std::result::Result<T, ProtonLinkError>;

/// Errors returned by the proton-link client.
///
/// Pre-flight errors (`QueryError`, `NetworkError`, `ServerError`) are
/// returned from `query()` itself, before any record is produced.
/// Mid-stream errors (`DecodeError`, `Cancelled`) surface from
/// [`QueryStream::next`](crate::QueryStream::next) at the offending point.
#[derive(Debug, Error)]
pub enum ProtonLinkError {
    /// Malformed caller input, rejected before any network exchange.
    #[error("Invalid query: {0}")]
    QueryError(String),

    /// Client construction or configuration failure.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Transport-level failure reaching the server or reading the body.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Server was reached but rejected or failed the query.
    /// `message` carries the response body text verbatim.
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// One response line was not a valid JSON object. Terminal for the
    /// record sequence; the message embeds a truncated line preview.
    #[error("Failed to parse NDJSON line: {0}")]
    DecodeError(String),

    /// The exchange was aborted — explicitly, via a linked external
    /// cancellation token, or by the connect timeout.
    #[error("Query aborted or timed out")]
    Cancelled,
}

impl ProtonLinkError {
    /// Returns `true` for the cancellation/timeout error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
