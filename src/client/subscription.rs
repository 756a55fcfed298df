//! Stream consumption: pairing frames into events, interpreting control
//! signals, and the subscription surface.
//!
//! The wire interleaves three kinds of frames: `event` lines carrying a
//! label, `data` lines carrying a JSON body, and `keep-alive` lines that
//! only hold the connection open. An event label applies to every `data`
//! line that follows it until the next `event` line; `cancel` and
//! `auth_revoked` labels are control signals that terminate the stream
//! with a typed failure instead of producing a payload.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::client::dispatch::Dispatcher;
use crate::client::parser::{Frame, FrameParser};
use crate::client::utils::is_vacant;
use crate::error::{FiretreeError, Result};
use crate::protocol::{EVENT_AUTH_REVOKED, EVENT_CANCEL, KEY_DATA, KEY_EVENT, KEY_KEEP_ALIVE};
use crate::types::StreamPayload;

/// Pairs `event` frames with the `data` frames that follow them and turns
/// control signals into typed failures.
///
/// The pending label is not cleared by a dispatch: one `event` line applies
/// to every subsequent `data` line until another `event` line overwrites
/// it.
#[derive(Debug)]
pub(crate) struct EventAccumulator {
    pending: Option<String>,
    stream_id: String,
}

impl EventAccumulator {
    pub(crate) fn new(stream_id: impl Into<String>) -> Self {
        EventAccumulator {
            pending: None,
            stream_id: stream_id.into(),
        }
    }

    /// Absorb one frame. `Ok(Some(..))` carries a payload ready for
    /// dispatch; `Ok(None)` means the frame was absorbed silently.
    pub(crate) fn accept(&mut self, frame: Frame) -> Result<Option<StreamPayload>> {
        match frame.key.as_str() {
            KEY_KEEP_ALIVE => Ok(None),
            KEY_EVENT if frame.value == EVENT_CANCEL => {
                tracing::warn!(stream_id = %self.stream_id, "stream cancelled by server");
                Err(FiretreeError::StreamCancelled)
            }
            KEY_EVENT if frame.value == EVENT_AUTH_REVOKED => {
                tracing::warn!(stream_id = %self.stream_id, "stream auth revoked by server");
                Err(FiretreeError::StreamAuthRevoked)
            }
            KEY_EVENT => {
                self.pending = Some(frame.value);
                Ok(None)
            }
            KEY_DATA => {
                let value: Value = serde_json::from_str(&frame.value)?;
                if is_vacant(&value) {
                    return Ok(None);
                }
                let event = match self.pending.as_deref() {
                    Some(event) if !event.is_empty() => event.to_string(),
                    // data with no preceding event label is dropped
                    _ => return Ok(None),
                };
                let Value::Object(mut fields) = value else {
                    return Err(FiretreeError::Decode(format!(
                        "data frame is not a JSON object: {value}"
                    )));
                };
                // injected keys win over body keys of the same name
                fields.remove("event");
                fields.remove("stream_id");
                Ok(Some(StreamPayload {
                    event,
                    stream_id: self.stream_id.clone(),
                    fields,
                }))
            }
            // unrecognized keys are ignored
            _ => Ok(None),
        }
    }
}

/// Drive one stream connection to completion: read chunks, frame them,
/// accumulate events, and dispatch every completed payload.
///
/// Returns `Ok(())` when the server closes the connection, or the first
/// control/protocol/transport failure. In-flight handler tasks are neither
/// awaited nor cancelled on the way out.
pub(crate) async fn drive_stream<S, E>(
    chunks: S,
    mut accumulator: EventAccumulator,
    dispatcher: &Dispatcher,
) -> Result<()>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<FiretreeError>,
{
    futures::pin_mut!(chunks);
    let mut parser = FrameParser::new();

    while let Some(chunk) = chunks.next().await {
        parser.feed(&chunk.map_err(Into::into)?);
        while let Some(frame) = parser.next_frame()? {
            if let Some(payload) = accumulator.accept(frame)? {
                dispatcher.dispatch(payload);
            }
        }
    }

    if let Some(frame) = parser.finish()? {
        if let Some(payload) = accumulator.accept(frame)? {
            dispatcher.dispatch(payload);
        }
    }

    Ok(())
}

/// Read loop behind [`Subscription`]: identical framing and accumulation,
/// but payloads are delivered through a channel in arrival order and the
/// first failure is forwarded as the final item.
pub(crate) async fn pump_subscription<S, E>(
    chunks: S,
    mut accumulator: EventAccumulator,
    tx: mpsc::Sender<Result<StreamPayload>>,
) where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<FiretreeError>,
{
    let chunks = chunks.fuse();
    futures::pin_mut!(chunks);
    let mut parser = FrameParser::new();

    loop {
        let update = match next_event(&mut parser, chunks.as_mut(), &mut accumulator).await {
            Ok(Some(payload)) => Ok(payload),
            Ok(None) => return,
            Err(e) => Err(e),
        };
        let terminal = update.is_err();
        if tx.send(update).await.is_err() || terminal {
            // receiver dropped, or the failure was the stream's last word
            return;
        }
    }
}

/// Pull the next dispatched payload out of the connection, reading more
/// chunks as needed. `Ok(None)` means the connection closed cleanly.
async fn next_event<S, E>(
    parser: &mut FrameParser,
    mut chunks: Pin<&mut S>,
    accumulator: &mut EventAccumulator,
) -> Result<Option<StreamPayload>>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<FiretreeError>,
{
    loop {
        while let Some(frame) = parser.next_frame()? {
            if let Some(payload) = accumulator.accept(frame)? {
                return Ok(Some(payload));
            }
        }
        match chunks.next().await {
            Some(chunk) => parser.feed(&chunk.map_err(Into::into)?),
            None => {
                if let Some(frame) = parser.finish()? {
                    return accumulator.accept(frame);
                }
                return Ok(None);
            }
        }
    }
}

/// A live subscription yielding decoded payloads as a
/// [`Stream`](futures::Stream).
///
/// Updates arrive in wire order. A control or protocol failure is delivered
/// as the final `Err` item, after which the stream is exhausted. Dropping
/// the subscription disconnects the read loop.
pub struct Subscription {
    inner: ReceiverStream<Result<StreamPayload>>,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::Receiver<Result<StreamPayload>>) -> Self {
        Subscription {
            inner: ReceiverStream::new(receiver),
        }
    }

    /// Receive the next update, or `None` once the stream has ended.
    pub async fn next_update(&mut self) -> Option<Result<StreamPayload>> {
        self.inner.next().await
    }
}

impl Stream for Subscription {
    type Item = Result<StreamPayload>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
