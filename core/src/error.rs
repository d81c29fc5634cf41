//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because callers
//! routinely branch on "no such todo" and "the server rejected my input".
//! Every other unexpected status lands in `HttpError` with the raw body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; `message` is the server's explanation.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The server returned 422 for the submitted input.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The server returned any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The envelope decoded but carried no `data` where one was expected.
    #[error("response envelope has no data")]
    MissingData,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
