//! Authentication for the Proton HTTP interface.
//!
//! The engine accepts HTTP Basic Auth; the provider attaches the
//! appropriate Authorization header to outgoing requests.

use base64::{engine::general_purpose, Engine as _};

/// Authentication credentials for the Proton server.
///
/// # Examples
///
/// ```rust
/// use proton_link::AuthProvider;
///
/// // HTTP Basic Auth
/// let auth = AuthProvider::basic_auth("default".to_string(), "secret".to_string());
///
/// // No authentication (open local engine)
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// HTTP Basic Auth (username, password)
    BasicAuth(String, String),

    /// No authentication
    None,
}

impl AuthProvider {
    /// Create HTTP Basic Auth credentials.
    ///
    /// Encodes username:password as base64 for the Authorization: Basic
    /// header following RFC 7617.
    pub fn basic_auth(username: String, password: String) -> Self {
        Self::BasicAuth(username, password)
    }

    /// No authentication (engine with open HTTP interface).
    pub fn none() -> Self {
        Self::None
    }

    /// Attach authentication headers to an HTTP request builder.
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::BasicAuth(username, password) => {
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                request.header("Authorization", format!("Basic {}", encoded))
            },
            Self::None => request,
        }
    }

    /// Check if authentication is configured.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}
