//! # proton-link
//!
//! Async client driver for a Proton streaming-SQL engine, speaking its
//! HTTP/NDJSON interface.
//!
//! Streaming queries over unbounded data never finish, so the driver
//! never materializes a result set. Each response line is one JSON
//! object; records are decoded incrementally as body chunks arrive and
//! pulled one at a time, with constant memory use however long the
//! stream runs.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use proton_link::ProtonLinkClient;
//!
//! #[tokio::main]
//! async fn main() -> proton_link::Result<()> {
//!     let client = ProtonLinkClient::builder()
//!         .host("localhost")
//!         .port(3218)
//!         .build()?;
//!
//!     let mut stream = client
//!         .query("SELECT car_id, speed_kmh FROM car_live_data WHERE speed_kmh > 80")
//!         .await?;
//!
//!     while let Some(record) = stream.next().await {
//!         println!("row: {:?}", record?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Cancellation
//!
//! Every query owns one cancellation token. An explicit
//! [`QueryStream::abort`], a caller-supplied [`CancellationToken`]
//! linked through [`QueryOptions`], and the configured connect timeout
//! all converge on it: the first trigger wins, later ones are no-ops,
//! and the in-flight exchange is torn down at the next suspension point.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod stream;

mod decode;
mod query;

pub use auth::AuthProvider;
pub use client::{ProtonConfig, ProtonLinkClient, ProtonLinkClientBuilder};
pub use error::{ProtonLinkError, Result};
pub use models::{QueryOptions, Record};
pub use stream::{AbortHandle, QueryStream};

// Re-exported so callers can hold a cancellation handle without taking a
// direct tokio-util dependency.
pub use tokio_util::sync::CancellationToken;
