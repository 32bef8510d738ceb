//! SDK-wide error types using thiserror
//!
//! All errors surfaced by the SDK are wrapped in SdkError so callers can
//! distinguish bad local input from transient upstream failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    /// Missing or malformed client configuration (private key, account id).
    /// Fatal; retrying with the same configuration cannot succeed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed hex / decimal input or an unknown coin or contract id.
    /// Fatal for the current call; nothing was sent to the exchange.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The underlying STARK curve primitive rejected the operation.
    #[error("Signing error: {0}")]
    Signing(String),

    /// The exchange answered with a non-success business code.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// Transport-level failure. Caller-retryable.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not decode.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SdkError
pub type SdkResult<T> = std::result::Result<T, SdkError>;
