#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Module Structure
//!
//! - **[client]** - HTTP client, stream consumption, handler dispatch
//! - **[error]** - Error types and result handling
//! - **[types]** - Payload types shared across the crate
//! - **[protocol]** - Wire-format constants

pub mod client;
pub mod error;
pub mod protocol;
pub mod types;

pub use client::{
    BlockingHandler, ClientConfig, EventHandler, FiretreeClient, FnHandler, Frame, FrameParser,
    Subscription,
};
pub use error::{FiretreeError, Result};
pub use types::{Params, StreamPayload};
