//! Client configuration.

use std::time::Duration;

use tokio::runtime::Handle;

/// Configuration for [`FiretreeClient`](crate::FiretreeClient).
///
/// # Examples
///
/// ```no_run
/// use firetree::{ClientConfig, FiretreeClient};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> firetree::Result<()> {
/// let config = ClientConfig {
///     auth: Some("secret-token".to_string()),
///     request_timeout: Some(Duration::from_secs(10)),
///     ..Default::default()
/// };
/// let client = FiretreeClient::with_config("https://mydb.example.com", config)?;
/// # let _ = client;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Credential appended to every request as the `auth` query parameter.
    /// `None` sends requests unauthenticated.
    pub auth: Option<String>,
    /// Timeout applied to each request/response call. Streaming requests
    /// always run unbounded. `None` disables the timeout.
    pub request_timeout: Option<Duration>,
    /// How long an idle pooled connection is kept around.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// Runtime that handler tasks and subscription read loops are spawned
    /// on. Defaults to the runtime the client is constructed inside.
    pub runtime: Option<Handle>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            auth: None,
            request_timeout: Some(Duration::from_secs(30)),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 8,
            runtime: None,
        }
    }
}
