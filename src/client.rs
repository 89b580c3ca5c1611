//! Main Proton client with builder pattern.
//!
//! Provides the primary interface for connecting to a Proton engine and
//! executing streaming SQL queries.

use std::time::Duration;

use crate::{
    auth::AuthProvider,
    error::{ProtonLinkError, Result},
    models::QueryOptions,
    query::QueryExecutor,
    stream::QueryStream,
};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3218;

/// Connection configuration for a Proton engine.
///
/// Immutable per client instance. Defaults target a local engine on the
/// standard HTTP port.
#[derive(Debug, Clone)]
pub struct ProtonConfig {
    /// Engine host (default: "localhost")
    pub host: String,
    /// Engine HTTP port (default: 3218)
    pub port: u16,
    /// Optional username; when set, requests carry HTTP Basic Auth.
    pub username: Option<String>,
    /// Optional password; an unset password with a set username encodes
    /// as the empty string.
    pub password: Option<String>,
    /// Bound on connection/header latency for each query. Streaming
    /// duration is never bounded; `None` disables the timeout.
    pub connect_timeout: Option<Duration>,
}

impl Default for ProtonConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            connect_timeout: None,
        }
    }
}

/// Main Proton client.
///
/// Use [`ProtonLinkClientBuilder`] to construct instances with custom
/// configuration. Each query is a single independent HTTP exchange whose
/// result set streams incrementally; see [`QueryStream`].
///
/// # Examples
///
/// ```rust,no_run
/// use proton_link::ProtonLinkClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ProtonLinkClient::builder()
///     .host("proton.internal")
///     .port(3218)
///     .basic_auth("default", "")
///     .build()?;
///
/// let mut stream = client.query("SELECT * FROM car_live_data").await?;
/// while let Some(record) = stream.next().await {
///     println!("row: {:?}", record?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProtonLinkClient {
    base_url: String,
    query_executor: QueryExecutor,
}

impl ProtonLinkClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ProtonLinkClientBuilder {
        ProtonLinkClientBuilder::new()
    }

    /// Create a client from an explicit configuration.
    pub fn new(config: ProtonConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProtonLinkError::ConfigurationError(e.to_string()))?;

        let auth = match &config.username {
            Some(username) => AuthProvider::basic_auth(
                username.clone(),
                config.password.clone().unwrap_or_default(),
            ),
            None => AuthProvider::none(),
        };

        let base_url = format!("http://{}:{}", config.host, config.port);
        let query_executor = QueryExecutor::new(
            base_url.clone(),
            http_client,
            auth,
            config.connect_timeout,
        );

        Ok(Self {
            base_url,
            query_executor,
        })
    }

    /// Execute a streaming SQL query.
    ///
    /// Fails before returning a stream when the SQL is blank, the engine
    /// is unreachable, the exchange is cancelled before headers arrive,
    /// or the engine answers with a non-success status (the response body
    /// text is carried in the error).
    pub async fn query(&self, sql: &str) -> Result<QueryStream> {
        self.query_with_options(sql, QueryOptions::default()).await
    }

    /// Execute a streaming SQL query with per-query options.
    ///
    /// # Example
    /// ```rust,no_run
    /// # async fn example() -> proton_link::Result<()> {
    /// use proton_link::{CancellationToken, ProtonLinkClient, QueryOptions};
    ///
    /// let client = ProtonLinkClient::builder().build()?;
    /// let stop = CancellationToken::new();
    /// let options = QueryOptions::new().with_cancellation(stop.clone());
    ///
    /// let mut stream = client
    ///     .query_with_options("SELECT * FROM car_live_data", options)
    ///     .await?;
    /// // stop.cancel() from anywhere aborts the stream.
    /// # Ok(())
    /// # }
    /// ```
    pub async fn query_with_options(
        &self,
        sql: &str,
        options: QueryOptions,
    ) -> Result<QueryStream> {
        self.query_executor.execute(sql, options).await
    }

    /// The engine URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builder for configuring [`ProtonLinkClient`] instances.
#[derive(Debug, Clone, Default)]
pub struct ProtonLinkClientBuilder {
    config: ProtonConfig,
}

impl ProtonLinkClientBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the engine host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the engine HTTP port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set HTTP Basic Auth credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    /// Bound connection/header latency for each query.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Bound connection/header latency for each query, in milliseconds.
    pub fn connect_timeout_millis(self, millis: u64) -> Self {
        self.connect_timeout(Duration::from_millis(millis))
    }

    /// Build the client.
    pub fn build(self) -> Result<ProtonLinkClient> {
        ProtonLinkClient::new(self.config)
    }
}
