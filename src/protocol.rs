//! Wire-format constants for the event-stream protocol.
//!
//! Each frame is a single `key: value` line; blank lines separate events.
//! The `event` values listed here are reserved control signals, every other
//! value is an application event label.

/// Frame key carrying an event label.
pub const KEY_EVENT: &str = "event";
/// Frame key carrying a JSON body.
pub const KEY_DATA: &str = "data";
/// Frame key the server uses to keep idle connections alive.
pub const KEY_KEEP_ALIVE: &str = "keep-alive";

/// Control value: the stream's location is no longer readable.
pub const EVENT_CANCEL: &str = "cancel";
/// Control value: the stream's credentials have expired.
pub const EVENT_AUTH_REVOKED: &str = "auth_revoked";

/// Separator between a frame's key and value.
pub const FRAME_SEPARATOR: &str = ": ";

/// Suffix appended to every request URL.
pub const JSON_SUFFIX: &str = ".json";
/// `Accept` value that selects the event-stream representation.
pub const EVENT_STREAM_MIME: &str = "text/event-stream";
/// Query key carrying the auth credential.
pub const AUTH_PARAM: &str = "auth";
