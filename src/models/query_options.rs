use tokio_util::sync::CancellationToken;

/// Per-query options.
///
/// The cancellation token stays caller-owned: the driver links a child
/// token to it, so cancelling the caller's token aborts the query while
/// the driver can never cancel the caller's token in return.
///
/// # Examples
///
/// ```rust
/// use proton_link::{CancellationToken, QueryOptions};
///
/// let stop = CancellationToken::new();
/// let options = QueryOptions::new().with_cancellation(stop.clone());
/// // later, from anywhere: stop.cancel();
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// External cancellation handle to link the query to, if any.
    pub cancellation: Option<CancellationToken>,
}

impl QueryOptions {
    /// Options with no external cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Link the query to a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
