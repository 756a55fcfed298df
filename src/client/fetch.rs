//! The firetree HTTP client: request/response operations and stream entry
//! points.
//!
//! Every operation addresses a location in the remote tree by joining the
//! base address with an optional relative path and the `.json` suffix.
//! Request/response calls map directly onto HTTP; [`FiretreeClient::stream`]
//! and [`FiretreeClient::subscribe`] hold a connection open and decode the
//! event-stream frames the server pushes over it.
//!
//! # Examples
//!
//! ```no_run
//! use firetree::{FiretreeClient, FnHandler, StreamPayload};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> firetree::Result<()> {
//!     let client = FiretreeClient::new("https://mydb.example.com")?;
//!
//!     client.put(&json!({"name": "ada"}), Some("app/users/1"), None).await?;
//!     let user = client.get(Some("app/users/1"), None).await?;
//!     println!("user: {user}");
//!
//!     client
//!         .stream(
//!             FnHandler::new(|payload: StreamPayload| async move {
//!                 println!("{}: {:?}", payload.event, payload.fields);
//!             }),
//!             Some("app/users"),
//!             None,
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use url::Url;

use crate::client::config::ClientConfig;
use crate::client::dispatch::{Dispatcher, EventHandler};
use crate::client::subscription::{
    drive_stream, pump_subscription, EventAccumulator, Subscription,
};
use crate::client::utils::join_url;
use crate::error::{FiretreeError, Result};
use crate::protocol::{AUTH_PARAM, EVENT_STREAM_MIME};
use crate::types::Params;

/// Async client for a Firebase-style realtime tree database.
///
/// One client owns one connection pool; clones share it. The runtime handle
/// captured at construction drives handler dispatch and subscription read
/// loops.
#[derive(Debug, Clone)]
pub struct FiretreeClient {
    http: reqwest::Client,
    base_url: String,
    config: Arc<ClientConfig>,
    runtime: Handle,
}

impl FiretreeClient {
    /// Create a client for `base_url` with default configuration.
    ///
    /// Must be called inside a tokio runtime: the runtime is captured here
    /// and used for every spawned handler task. Use
    /// [`with_config`](Self::with_config) to supply a handle explicitly.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        Url::parse(base_url)?;

        let http = reqwest::Client::builder()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;

        let runtime = config.runtime.clone().unwrap_or_else(Handle::current);

        Ok(FiretreeClient {
            http,
            base_url: base_url.to_string(),
            config: Arc::new(config),
            runtime,
        })
    }

    /// The base address this client was constructed with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read the value at `path`.
    pub async fn get(&self, path: Option<&str>, params: Option<&Params>) -> Result<Value> {
        self.request(Method::GET, path, None, params).await
    }

    /// Write `value` at `path`, replacing whatever is there.
    pub async fn put(
        &self,
        value: &Value,
        path: Option<&str>,
        params: Option<&Params>,
    ) -> Result<Value> {
        self.request(Method::PUT, path, Some(value), params).await
    }

    /// Append `value` under `path`; the server assigns the child key.
    pub async fn post(
        &self,
        value: &Value,
        path: Option<&str>,
        params: Option<&Params>,
    ) -> Result<Value> {
        self.request(Method::POST, path, Some(value), params).await
    }

    /// Merge `value` into the object at `path`.
    pub async fn patch(
        &self,
        value: &Value,
        path: Option<&str>,
        params: Option<&Params>,
    ) -> Result<Value> {
        self.request(Method::PATCH, path, Some(value), params).await
    }

    /// Delete the value at `path`.
    pub async fn delete(&self, path: Option<&str>, params: Option<&Params>) -> Result<Value> {
        self.request(Method::DELETE, path, None, params).await
    }

    /// Open the event stream at `path` and dispatch every update to
    /// `handler`.
    ///
    /// Frames are consumed in arrival order and each completed update is
    /// handed to `handler` on its own task, so stream consumption never
    /// waits on handler execution. The call runs until the server closes
    /// the connection (`Ok`) or a control or protocol failure unwinds the
    /// read loop (`Err`); in-flight handler tasks keep running either way.
    /// The client never reconnects on its own.
    pub async fn stream<H>(
        &self,
        handler: H,
        path: Option<&str>,
        stream_id: Option<&str>,
    ) -> Result<()>
    where
        H: EventHandler,
    {
        let stream_id = resolved_stream_id(stream_id, path);
        let response = self.open_stream(path).await?;
        tracing::debug!(stream_id = %stream_id, "event stream connected");

        let dispatcher = Dispatcher::new(self.runtime.clone(), Arc::new(handler));
        drive_stream(
            response.bytes_stream(),
            EventAccumulator::new(stream_id),
            &dispatcher,
        )
        .await
    }

    /// Open the event stream at `path` and receive updates as a
    /// [`Stream`](futures::Stream) instead of through a handler.
    ///
    /// The read loop runs on the client's runtime; a control or protocol
    /// failure arrives as the final `Err` item. Dropping the subscription
    /// disconnects it.
    pub fn subscribe(&self, path: Option<&str>, stream_id: Option<&str>) -> Subscription {
        let stream_id = resolved_stream_id(stream_id, path);
        let (tx, rx) = mpsc::channel(64);

        let client = self.clone();
        let path = path.map(str::to_string);
        self.runtime.spawn(async move {
            let response = match client.open_stream(path.as_deref()).await {
                Ok(response) => response,
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            };
            tracing::debug!(stream_id = %stream_id, "event stream connected");
            pump_subscription(
                response.bytes_stream(),
                EventAccumulator::new(stream_id),
                tx,
            )
            .await;
        });

        Subscription::new(rx)
    }

    /// Release the underlying connection pool.
    ///
    /// Consumes the client; pooled connections wind down once every clone
    /// (including live subscriptions) has been dropped.
    pub fn close(self) {
        tracing::debug!(base_url = %self.base_url, "closing client");
    }

    async fn request(
        &self,
        method: Method,
        path: Option<&str>,
        value: Option<&Value>,
        params: Option<&Params>,
    ) -> Result<Value> {
        let url = join_url(&self.base_url, path);
        tracing::debug!(%method, %url, "issuing request");

        let mut builder = self.http.request(method, &url);
        if let Some(timeout) = self.config.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder = self.apply_query(builder, params);
        if let Some(value) = value {
            builder = builder.body(serde_json::to_string(value)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%url, %status, "request rejected");
            return Err(FiretreeError::Status(status));
        }

        Ok(response.json().await?)
    }

    async fn open_stream(&self, path: Option<&str>) -> Result<reqwest::Response> {
        let url = join_url(&self.base_url, path);
        let builder = self.http.get(&url).header(ACCEPT, EVENT_STREAM_MIME);
        let response = self.apply_query(builder, None).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%url, %status, "stream request rejected");
            return Err(FiretreeError::Status(status));
        }
        Ok(response)
    }

    fn apply_query(
        &self,
        mut builder: reqwest::RequestBuilder,
        params: Option<&Params>,
    ) -> reqwest::RequestBuilder {
        if let Some(params) = params {
            builder = builder.query(params);
        }
        if let Some(auth) = &self.config.auth {
            builder = builder.query(&[(AUTH_PARAM, auth.as_str())]);
        }
        builder
    }
}

fn resolved_stream_id(stream_id: Option<&str>, path: Option<&str>) -> String {
    stream_id.or(path).unwrap_or_default().to_string()
}
