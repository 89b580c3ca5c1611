//! `QueryStream` – consumer handle for one streaming query.
//!
//! Owns the response body stream and the decoder state, and exposes the
//! decoded records as a pull-based sequence. Cancellation (explicit
//! abort, linked external token, connect timeout) converges on a single
//! token that short-circuits the next pull.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::decode::NdjsonDecoder;
use crate::error::{ProtonLinkError, Result};
use crate::models::Record;

/// Raw body chunks as delivered by the HTTP transport.
pub(crate) type BodyStream =
    Pin<Box<dyn Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send>>;

/// Cheap, cloneable handle that aborts the in-flight exchange.
///
/// Valid for the lifetime of the exchange and idempotent: the first
/// trigger wins, later calls are no-ops.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    token: CancellationToken,
}

impl AbortHandle {
    /// Cancel the in-flight exchange.
    pub fn abort(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the exchange has been cancelled.
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Lazy, forward-only sequence of records from one streaming query.
///
/// Created by [`ProtonLinkClient::query`](crate::ProtonLinkClient::query)
/// once response headers have arrived. Pull records with [`next`];
/// the sequence ends with `None` after exhaustion, a terminal error, or
/// an abort. Dropping the stream releases the underlying exchange.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> proton_link::Result<()> {
/// let client = proton_link::ProtonLinkClient::builder().build()?;
/// let mut stream = client.query("SELECT * FROM car_live_data").await?;
/// while let Some(record) = stream.next().await {
///     println!("row: {:?}", record?);
/// }
/// # Ok(())
/// # }
/// ```
///
/// [`next`]: QueryStream::next
pub struct QueryStream {
    /// Body chunk producer. `None` once released (EOF, error, abort).
    body: Option<BodyStream>,
    decoder: NdjsonDecoder,
    /// Decoded but not yet consumed records.
    pending: VecDeque<Record>,
    /// Terminal error waiting to surface after `pending` drains.
    failure: Option<ProtonLinkError>,
    cancel: CancellationToken,
    done: bool,
}

impl std::fmt::Debug for QueryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStream")
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .field("decoder", &self.decoder)
            .field("pending", &self.pending)
            .field("failure", &self.failure)
            .field("cancel", &self.cancel)
            .field("done", &self.done)
            .finish()
    }
}

impl QueryStream {
    pub(crate) fn new(body: BodyStream, cancel: CancellationToken) -> Self {
        Self {
            body: Some(body),
            decoder: NdjsonDecoder::new(),
            pending: VecDeque::new(),
            failure: None,
            cancel,
            done: false,
        }
    }

    /// Pull the next record.
    ///
    /// Returns `None` once the sequence has terminated. A `DecodeError`
    /// or `Cancelled` error is yielded exactly once and ends the
    /// sequence; records decoded before a malformed line are still
    /// delivered ahead of the error.
    pub async fn next(&mut self) -> Option<Result<Record>> {
        loop {
            if self.done {
                return None;
            }

            // Abort wins over already-decoded records while the exchange
            // is still open.
            if self.body.is_some() && self.cancel.is_cancelled() {
                return self.fail_cancelled();
            }

            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }

            if let Some(failure) = self.failure.take() {
                self.done = true;
                return Some(Err(failure));
            }

            let Some(body) = self.body.as_mut() else {
                self.done = true;
                return None;
            };

            // Bind the select outcome before touching `self` again: the
            // body future borrows `self.body` until the select ends.
            let pulled = tokio::select! {
                biased;

                _ = self.cancel.cancelled() => None,

                chunk = body.next() => Some(chunk),
            };

            let Some(chunk) = pulled else {
                return self.fail_cancelled();
            };

            match chunk {
                Some(Ok(bytes)) => {
                    if let Err(e) = self.decoder.feed(&bytes, &mut self.pending) {
                        log::warn!("[STREAM] Terminating on decode failure: {}", e);
                        self.body = None;
                        self.failure = Some(e);
                    }
                },
                Some(Err(e)) => {
                    self.body = None;
                    self.failure = Some(if self.cancel.is_cancelled() {
                        ProtonLinkError::Cancelled
                    } else {
                        log::warn!("[STREAM] Body read failed: {}", e);
                        ProtonLinkError::NetworkError(e)
                    });
                },
                None => {
                    // End of body: flush the pending partial line, then
                    // drain whatever was decoded.
                    let flushed = self.decoder.finish(&mut self.pending);
                    self.body = None;
                    if let Err(e) = flushed {
                        log::warn!("[STREAM] Terminating on decode failure: {}", e);
                        self.failure = Some(e);
                    }
                },
            }
        }
    }

    /// Abort the in-flight exchange.
    ///
    /// Safe to call multiple times — subsequent calls are no-ops.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// Handle for aborting the exchange from elsewhere (another task, a
    /// signal handler) while this stream is being consumed.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            token: self.cancel.clone(),
        }
    }

    /// Returns `true` once the exchange has been cancelled.
    pub fn is_aborted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Release everything and surface the single cancellation error.
    fn fail_cancelled(&mut self) -> Option<Result<Record>> {
        log::debug!("[STREAM] Cancelled, releasing response body");
        self.body = None;
        self.pending.clear();
        self.failure = None;
        self.done = true;
        Some(Err(ProtonLinkError::Cancelled))
    }
}

impl Drop for QueryStream {
    fn drop(&mut self) {
        // A consumer that stops iterating early must still tear down the
        // exchange; dropping the body closes the connection and the
        // cancel marks any outstanding AbortHandle as fired.
        self.cancel.cancel();
    }
}
