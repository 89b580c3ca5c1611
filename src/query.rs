//! SQL query execution with HTTP transport.
//!
//! Builds the outbound request, wires the converged cancellation token
//! (external signal + connect timeout + explicit abort), and hands the
//! response body stream to [`QueryStream`].

use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    auth::AuthProvider,
    error::{ProtonLinkError, Result},
    models::QueryOptions,
    stream::QueryStream,
};

/// Handles streaming SQL query execution via HTTP.
#[derive(Clone)]
pub(crate) struct QueryExecutor {
    base_url: String,
    http_client: reqwest::Client,
    auth: AuthProvider,
    connect_timeout: Option<Duration>,
}

impl QueryExecutor {
    pub(crate) fn new(
        base_url: String,
        http_client: reqwest::Client,
        auth: AuthProvider,
        connect_timeout: Option<Duration>,
    ) -> Self {
        Self {
            base_url,
            http_client,
            auth,
            connect_timeout,
        }
    }

    /// Execute a SQL query, returning the record stream once response
    /// headers have arrived.
    pub(crate) async fn execute(&self, sql: &str, options: QueryOptions) -> Result<QueryStream> {
        if sql.trim().is_empty() {
            return Err(ProtonLinkError::QueryError(
                "SQL query cannot be empty".to_string(),
            ));
        }

        let sql_preview = match sql.char_indices().nth(80) {
            Some((idx, _)) => format!("{}...", &sql[..idx]),
            None => sql.to_string(),
        };
        debug!(
            "[QUERY] Starting query: \"{}\" (len={})",
            sql_preview.replace('\n', " "),
            sql.len()
        );

        // One token per call. The caller's token (if any) is observed via
        // a child: cancellation propagates in, never back out. The
        // connect timeout and QueryStream::abort cancel the same token,
        // so whichever fires first wins and later triggers are no-ops.
        let cancel = match &options.cancellation {
            Some(external) => external.child_token(),
            None => CancellationToken::new(),
        };

        // JSONEachRow framing: one JSON object per line, the reliable
        // choice for unbounded result sets.
        let url = format!("{}/?default_format=JSONEachRow", self.base_url);
        let request = self
            .http_client
            .post(&url)
            .header("Content-Type", "text/plain")
            .body(sql.to_string());
        let request = self.auth.apply_to_request(request);

        debug!("[HTTP] Sending POST to {}", url);
        let start = Instant::now();

        // The timeout bounds connection/header latency only; the sleep is
        // dropped (disarmed) the moment headers arrive.
        let response = tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("[HTTP] Cancelled before response headers");
                return Err(ProtonLinkError::Cancelled);
            }

            _ = connect_deadline(self.connect_timeout) => {
                warn!(
                    "[HTTP] Connect timeout ({:?}) before response headers",
                    self.connect_timeout
                );
                cancel.cancel();
                return Err(ProtonLinkError::Cancelled);
            }

            result = request.send() => match result {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        "[HTTP] Request failed: {} duration_ms={}",
                        e,
                        start.elapsed().as_millis()
                    );
                    return Err(e.into());
                },
            },
        };

        let status = response.status();
        debug!(
            "[HTTP] Response headers received: status={} duration_ms={}",
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(
                "[HTTP] Server error: status={} message=\"{}\"",
                status, message
            );
            return Err(ProtonLinkError::ServerError {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(QueryStream::new(
            Box::pin(response.bytes_stream()),
            cancel,
        ))
    }
}

/// Pending forever when no connect timeout is configured.
async fn connect_deadline(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}
