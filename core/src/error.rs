//! Error types for the Todoist sync client.
//!
//! # Design
//! The sync API signals success strictly with HTTP 200, so every other status
//! lands in `HttpError` with the raw status code and body for the operator
//! log. Callers decide which variants reach the front-end; the core only
//! classifies.

/// Errors returned by `TodoistClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The provider answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A 200 body could not be deserialized into the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The command payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// The HTTP status carried by `HttpError`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
