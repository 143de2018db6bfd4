//! Error types for the Marketo client.
//!
//! # Design
//! Local validation failures (`InvalidArgument`, `Config`) are raised before
//! any request is built, so callers can tell "nothing was sent" apart from a
//! failed round trip. Non-2xx responses land in `Http` with the raw status
//! and body; Marketo reports most API-level failures inside a 200 response
//! (`success: false`), and those are left for the caller to inspect through
//! `ApiResponse::errors`.

use thiserror::Error;

/// Errors returned by `MarketoClient`, `Command` and `Session`.
#[derive(Debug, Error)]
pub enum MarketoError {
    /// An argument failed local validation. No request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The client configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport failed before a response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl MarketoError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MarketoError::InvalidArgument(msg.into())
    }
}

impl From<config::ConfigError> for MarketoError {
    fn from(err: config::ConfigError) -> Self {
        MarketoError::Config(err.to_string())
    }
}
