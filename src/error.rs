//! Error types and result handling.
//!
//! All fallible operations in this crate return [`Result`], and every
//! failure mode is a variant of [`FiretreeError`]. Stream failures are
//! terminal: the read loop exits as soon as one is raised, in-flight
//! handler tasks keep running, and reconnection is left to the caller.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, FiretreeError>;

/// Errors surfaced by the firetree client.
#[derive(Debug, Error)]
pub enum FiretreeError {
    /// The server cancelled the stream with an `event: cancel` control
    /// frame: the requested location is no longer allowed due to
    /// security/rules changes.
    #[error("stream cancelled: the requested location is no longer allowed due to security/rules changes")]
    StreamCancelled,

    /// The server ended the stream with an `event: auth_revoked` control
    /// frame: the auth credentials have expired.
    #[error("stream auth revoked: the auth credentials have expired")]
    StreamAuthRevoked,

    /// A `data` frame violated the wire contract: invalid UTF-8, malformed
    /// JSON, or a non-vacant body that is not a JSON object.
    #[error("malformed data frame: {0}")]
    Decode(String),

    /// A request completed with a status other than 200.
    #[error("request failed with status {0}")]
    Status(StatusCode),

    /// The underlying HTTP transport failed.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL could not be parsed.
    #[error("invalid base url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<serde_json::Error> for FiretreeError {
    fn from(err: serde_json::Error) -> Self {
        FiretreeError::Decode(err.to_string())
    }
}

impl From<std::str::Utf8Error> for FiretreeError {
    fn from(err: std::str::Utf8Error) -> Self {
        FiretreeError::Decode(err.to_string())
    }
}
