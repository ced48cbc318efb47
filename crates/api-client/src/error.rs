//! Error types for API calls

/// Errors surfaced to callers of [`crate::ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with `status: "error"`. Carries the body verbatim.
    #[error("application error: {0}")]
    Application(serde_json::Value),

    /// The refresh endpoint rejected the session. The token has been purged
    /// and the user sent to the login route.
    #[error("session expired, login required")]
    SessionExpired,

    /// The response carried no recognisable envelope and no refresh applies
    /// (not a 401, or the request was already retried). No payload is kept.
    #[error("request rejected (HTTP {status})")]
    Rejected { status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("request encode failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Config(#[from] common::Error),

    #[error("session store error: {0}")]
    Store(#[from] session_store::Error),
}

impl Error {
    /// Server error payload, when the failure was an application error.
    pub fn application_payload(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Application(body) => Some(body),
            _ => None,
        }
    }
}

/// Result alias for API calls.
pub type Result<T> = std::result::Result<T, Error>;
