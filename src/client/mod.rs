//! Firetree HTTP client implementation.
//!
//! This module provides the complete client surface: request/response
//! operations against the remote tree plus consumption of the push-update
//! event stream.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch        - FiretreeClient and HTTP operations
//! ├── parser       - Incremental frame parser for the wire format
//! ├── subscription - Event accumulation, control signals, read loops
//! ├── dispatch     - Handler abstraction and non-blocking dispatch
//! ├── config       - Client configuration
//! └── utils        - URL joining and vacancy checks
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FiretreeClient`] | Main HTTP client |
//! | [`EventHandler`] | Consumer of dispatched stream payloads |
//! | [`FnHandler`] / [`BlockingHandler`] | Handler adapters for closures |
//! | [`Subscription`] | Stream-shaped alternative to handler dispatch |
//! | [`FrameParser`] | Low-level incremental wire parser |
//! | [`ClientConfig`] | Client configuration options |
//!
//! # Data Flow
//!
//! Raw stream bytes → [`FrameParser`] → event accumulation → control
//! signal interpretation (may raise) → dispatch → handler. Frames are
//! consumed and dispatched strictly in arrival order; handler completion
//! order is unspecified.

mod config;
mod dispatch;
mod fetch;
mod parser;
mod subscription;
mod utils;

pub use config::ClientConfig;
pub use dispatch::{BlockingHandler, EventHandler, FnHandler};
pub use fetch::FiretreeClient;
pub use parser::{Frame, FrameParser};
pub use subscription::Subscription;
pub use utils::{is_vacant, join_url};
