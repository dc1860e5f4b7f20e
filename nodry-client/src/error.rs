//! Client error types
//!
//! Every API call surfaces failures through [`ClientError`]. Nothing is
//! swallowed; callers decide whether to show a message or send the user back
//! to login (see [`ClientError::requires_login`]).

use nodry_model::ModelError;
use serde_json::Value;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Main client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the backend's `detail`/`error` text or
    /// a generic status line.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Credentials were rejected by the token endpoint
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Still unauthorized after a token refresh; the session was cleared
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// The shared token refresh failed
    #[error("Token refresh failed: {0}")]
    Refresh(#[from] RefreshFailure),

    /// Rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A 2xx body did not have the expected shape
    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// A local file (upload source, export target) could not be accessed
    #[error("File error for {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the persisted session failed
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    /// The client could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the caller should clear credentials and ask for a new login.
    pub fn requires_login(&self) -> bool {
        match self {
            ClientError::SessionExpired => true,
            ClientError::Refresh(failure) => failure.requires_login(),
            _ => false,
        }
    }

    /// HTTP status of a backend rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ModelError> for ClientError {
    fn from(err: ModelError) -> Self {
        ClientError::Validation(ValidationError::Model(err))
    }
}

/// Outcome of a failed shared refresh. Cloneable so every waiter on the
/// single in-flight refresh receives the same failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshFailure {
    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Refresh token expired. Please login again.")]
    Rejected { status: u16 },

    #[error("refresh request failed: {0}")]
    Transport(String),

    #[error("refresh response was not understood: {0}")]
    Decode(String),
}

impl RefreshFailure {
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            RefreshFailure::MissingRefreshToken
                | RefreshFailure::Rejected { .. }
        )
    }
}

/// Client-side validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File size must be less than {limit_mb}MB (got {size} bytes)", limit_mb = .limit / (1024 * 1024))]
    AttachmentTooLarge { size: u64, limit: u64 },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("{0}")]
    Model(#[from] ModelError),
}

/// Session persistence errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode session")]
    Encode(#[source] serde_json::Error),
}

/// Pull a human readable message out of an error body.
///
/// Prefers `detail`, then `error`, then flattens field validation errors
/// (`{"email": ["Enter a valid email address."]}`) into
/// `email: Enter a valid email address.`.
pub(crate) fn extract_error_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    for key in ["detail", "error"] {
        if let Some(Value::String(text)) = object.get(key)
            && !text.trim().is_empty()
        {
            return Some(text.clone());
        }
    }

    let mut parts = Vec::new();
    for (field, value) in object {
        let messages: Vec<&str> = match value {
            Value::String(text) => vec![text.as_str()],
            Value::Array(items) => {
                items.iter().filter_map(Value::as_str).collect()
            }
            _ => continue,
        };
        if !messages.is_empty() {
            parts.push(format!("{field}: {}", messages.join(" ")));
        }
    }
    (!parts.is_empty()).then(|| parts.join("; "))
}

/// Generic message used when the body carries nothing better.
pub(crate) fn status_message(status: u16) -> String {
    format!("HTTP error! status: {status}")
}
