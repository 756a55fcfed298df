//! Payload types shared between the client and the stream machinery.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters attached to a request, in order of appearance.
pub type Params = Vec<(String, String)>;

/// A decoded push update delivered to stream handlers.
///
/// The JSON body of a `data` frame is carried in [`fields`](Self::fields),
/// flattened so that serializing a payload reproduces the object the server
/// sent with `event` and `stream_id` merged in. Body keys named `event` or
/// `stream_id` are overwritten by the injected values.
///
/// A payload is only constructed when the decoded body is non-vacant and an
/// `event` frame has been seen on the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamPayload {
    /// Label of the most recent `event` frame (`patch`, `put`, ...).
    pub event: String,
    /// Identity of the stream this update arrived on. Defaults to the
    /// request path when the caller does not supply one.
    pub stream_id: String,
    /// The decoded body of the `data` frame.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
