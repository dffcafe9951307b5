//! Error types for the Retable API client.
//!
//! # Design
//! HTTP status codes are deliberately not part of the taxonomy: the Retable
//! API reports failures in the JSON body, and the client hands that body to
//! the caller as-is whatever the status was. Only failures that prevent a
//! body from reaching the caller become errors here.

use std::fmt;

/// Errors returned by `RetableClient` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS
    /// failure, timeout, malformed URL).
    TransportError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The response body was not valid JSON.
    DeserializationError(String),

    /// The column-mapping file could not be rewritten.
    CacheError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::TransportError(msg) => {
                write!(f, "transport failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::CacheError(msg) => {
                write!(f, "column-mapping cache write failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
