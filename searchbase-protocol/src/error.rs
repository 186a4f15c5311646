//! Error types for protocol value handling.

use thiserror::Error;

/// Errors produced while constructing, encoding, or decoding dynamic values.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The input text is not well-formed JSON, or a payload failed to
    /// serialize as JSON.
    #[error("malformed JSON payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// A non-finite number (NaN or infinity) cannot be represented in JSON.
    #[error("non-finite number cannot be encoded as JSON: {0}")]
    UnencodableNumber(f64),

    /// A native value has no representation among the six dynamic variants.
    #[error("unsupported native value: {0}")]
    UnsupportedNativeType(String),
}

/// Result type alias for protocol value operations.
pub type Result<T> = std::result::Result<T, ValueError>;
