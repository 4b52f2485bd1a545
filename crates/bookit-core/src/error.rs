// ── Core error types ──
//
// User-facing errors from bookit-core. Services and the controller only
// ever surface these; the `From<bookit_api::Error>` impl folds transport
// and HTTP failures into domain-level variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Client-side validation ───────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session is no longer valid: {message}")]
    Unauthorized { message: String },

    #[error("Not logged in")]
    NotLoggedIn,

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Backend answers ──────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Rejected by server: {message}")]
    Rejected { message: String },

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// `true` when the failure means the stored session should be dropped.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::Unauthorized { .. } | Self::NotLoggedIn
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bookit_api::Error> for CoreError {
    fn from(err: bookit_api::Error) -> Self {
        match err {
            bookit_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            bookit_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            bookit_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            bookit_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            bookit_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            bookit_api::Error::Api { status, message } => match status {
                403 => CoreError::PermissionDenied { message },
                404 => CoreError::NotFound { message },
                400 | 409 | 422 => CoreError::Rejected { message },
                _ => CoreError::Api {
                    message,
                    status: Some(status),
                },
            },
            bookit_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response: {message}"),
                status: None,
            },
        }
    }
}
