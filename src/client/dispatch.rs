//! Handler abstraction and non-blocking dispatch of stream payloads.
//!
//! The read loop hands every completed payload to a [`Dispatcher`], which
//! spawns the handler invocation as its own task and moves on to the next
//! frame immediately. Submission follows frame arrival order; completion
//! order across invocations is not guaranteed.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;

use crate::types::StreamPayload;

/// A consumer of stream payloads.
///
/// Implementations are invoked once per dispatched payload, each invocation
/// on its own task: the read loop never waits for a handler to finish, so
/// payload N+1 may be handed over while N is still being processed.
///
/// Failures inside a handler (panics included) are unobserved by the
/// client. Wrap the handler in its own reporting if those must be seen.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Process one payload.
    async fn handle(&self, payload: StreamPayload);
}

/// Adapts an async closure into an [`EventHandler`].
///
/// # Examples
///
/// ```
/// use firetree::{FnHandler, StreamPayload};
///
/// let handler = FnHandler::new(|payload: StreamPayload| async move {
///     println!("{}: {:?}", payload.event, payload.fields);
/// });
/// # let _ = handler;
/// ```
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    /// Wrap `f`, which is called once per payload.
    pub fn new(f: F) -> Self {
        FnHandler { f }
    }
}

#[async_trait]
impl<F, Fut> EventHandler for FnHandler<F>
where
    F: Fn(StreamPayload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, payload: StreamPayload) {
        (self.f)(payload).await;
    }
}

/// Adapts a synchronous callback into an [`EventHandler`].
///
/// Each invocation runs on the blocking worker pool, so a slow callback
/// occupies a blocking thread instead of stalling the runtime driving the
/// read loop.
pub struct BlockingHandler<F> {
    f: Arc<F>,
}

impl<F> BlockingHandler<F>
where
    F: Fn(StreamPayload) + Send + Sync + 'static,
{
    /// Wrap `f`, which is called once per payload.
    pub fn new(f: F) -> Self {
        BlockingHandler { f: Arc::new(f) }
    }
}

#[async_trait]
impl<F> EventHandler for BlockingHandler<F>
where
    F: Fn(StreamPayload) + Send + Sync + 'static,
{
    async fn handle(&self, payload: StreamPayload) {
        let f = Arc::clone(&self.f);
        let _ = tokio::task::spawn_blocking(move || f(payload)).await;
    }
}

/// Fans payloads out to the handler without blocking the read loop.
///
/// The runtime handle is captured once at client construction and every
/// dispatch spawns on it. Spawned tasks are detached: they are not tracked,
/// not awaited, and keep running when the stream tears down.
pub(crate) struct Dispatcher {
    runtime: Handle,
    handler: Arc<dyn EventHandler>,
}

impl Dispatcher {
    pub(crate) fn new(runtime: Handle, handler: Arc<dyn EventHandler>) -> Self {
        Dispatcher { runtime, handler }
    }

    /// Submit one payload for execution. Submission order follows call
    /// order; completion order is up to the scheduler.
    pub(crate) fn dispatch(&self, payload: StreamPayload) {
        tracing::trace!(event = %payload.event, stream_id = %payload.stream_id, "dispatching payload");
        let handler = Arc::clone(&self.handler);
        self.runtime.spawn(async move {
            handler.handle(payload).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    fn payload(event: &str) -> StreamPayload {
        StreamPayload {
            event: event.to_string(),
            stream_id: "test".to_string(),
            fields: match json!({"n": 1}) {
                Value::Object(map) => map,
                _ => unreachable!(),
            },
        }
    }

    #[tokio::test]
    async fn fn_handler_receives_payload() {
        let (tx, mut rx) = mpsc::channel(4);
        let dispatcher = Dispatcher::new(
            Handle::current(),
            Arc::new(FnHandler::new(move |payload: StreamPayload| {
                let tx = tx.clone();
                async move {
                    tx.send(payload).await.unwrap();
                }
            })),
        );

        dispatcher.dispatch(payload("patch"));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, "patch");
        assert_eq!(received.fields["n"], json!(1));
    }

    #[tokio::test]
    async fn blocking_handler_runs_off_the_read_loop() {
        let (tx, mut rx) = mpsc::channel(4);
        let dispatcher = Dispatcher::new(
            Handle::current(),
            Arc::new(BlockingHandler::new(move |payload: StreamPayload| {
                tx.blocking_send(payload).unwrap();
            })),
        );

        dispatcher.dispatch(payload("put"));
        assert_eq!(rx.recv().await.unwrap().event, "put");
    }

    #[tokio::test]
    async fn dispatch_submission_preserves_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let dispatcher = Dispatcher::new(
            Handle::current(),
            Arc::new(FnHandler::new(move |payload: StreamPayload| {
                let tx = tx.clone();
                async move {
                    tx.send(payload.event).await.unwrap();
                }
            })),
        );

        for event in ["first", "second", "third"] {
            dispatcher.dispatch(payload(event));
        }

        assert_eq!(rx.recv().await.unwrap(), "first");
        assert_eq!(rx.recv().await.unwrap(), "second");
        assert_eq!(rx.recv().await.unwrap(), "third");
    }

    #[tokio::test]
    async fn dispatch_does_not_wait_for_handler_completion() {
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let (done_tx, mut done_rx) = mpsc::channel(4);
        let release_rx = std::sync::Mutex::new(Some(release_rx));

        let dispatcher = Dispatcher::new(
            Handle::current(),
            Arc::new(FnHandler::new(move |payload: StreamPayload| {
                let gate = release_rx.lock().unwrap().take();
                let done_tx = done_tx.clone();
                async move {
                    if let Some(gate) = gate {
                        // first payload parks until released
                        let _ = gate.await;
                    }
                    done_tx.send(payload.event).await.unwrap();
                }
            })),
        );

        dispatcher.dispatch(payload("slow"));
        dispatcher.dispatch(payload("fast"));

        // the second handler finishes while the first is still parked
        assert_eq!(done_rx.recv().await.unwrap(), "fast");
        release_tx.send(()).unwrap();
        assert_eq!(done_rx.recv().await.unwrap(), "slow");
    }
}
