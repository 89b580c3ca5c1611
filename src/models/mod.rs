//! Data models for the proton-link client library.

pub mod query_options;
pub mod record;

pub use query_options::QueryOptions;
pub use record::Record;
