//! Error types for the LibreNMS client.
//!
//! # Design
//! `UnexpectedResponse` carries the raw status code and body of any device
//! lookup that matched neither the "found" nor the "not found" shape, so
//! callers get structured diagnostics. A duplicate hostname on registration
//! is not an error here: it comes back as an `Ok` JSON payload.

use std::fmt;

/// Errors returned by `LibreNmsClient` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The device lookup returned a status/body pair outside the two handled
    /// shapes (200 with `count > 0`, 404 with `status: "error"`).
    UnexpectedResponse { status: u16, body: String },

    /// A caller-supplied argument was rejected before any request was sent.
    InvalidArgument(String),

    /// No response was received: connection, TLS or timeout failure.
    Transport(String),

    /// The response body could not be decoded as JSON.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::UnexpectedResponse { status, body } => {
                write!(f, "unexpected response (HTTP {status}): {body}")
            }
            ApiError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ApiError::Transport(msg) => write!(f, "transport failure: {msg}"),
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
