//! Error types for the search client.

use searchbase_protocol::ValueError;
use thiserror::Error;

/// Boxed error type used at the transport boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while executing a search.
///
/// All variants are terminal for the current operation; the client never
/// retries internally. For streaming search, any of these ends the stream
/// after it is yielded; batches already produced remain valid.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP transport failed before a response was received
    /// (connection refused, timeout, ...). Wraps the underlying cause.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// A 2xx response body did not decode as a search page.
    #[error("failed to decode search response: {0}")]
    ResponseDecoding(#[source] serde_json::Error),

    /// The server rejected the request with a structured error message.
    #[error("search service error: {0}")]
    Api(String),

    /// A non-2xx status without a parseable error body.
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// The server reported the same `range.end` for two consecutive pages
    /// while more records were still owed. Aborting avoids refetching the
    /// same range forever.
    #[error("pagination stalled at offset {offset}: server did not advance range.end")]
    PaginationStalled {
        /// The offset the cursor was stuck at.
        offset: u64,
    },

    /// A query payload could not be encoded (e.g. non-finite filter value).
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
