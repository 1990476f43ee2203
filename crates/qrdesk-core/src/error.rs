// ── Core error types ──
//
// User-facing errors from qrdesk-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<qrdesk_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<qrdesk_api::Error> for CoreError {
    fn from(err: qrdesk_api::Error) -> Self {
        match err {
            qrdesk_api::Error::Transport(ref e) => {
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
            qrdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            qrdesk_api::Error::Api {
                status: 404,
                message,
            } => CoreError::NotFound { resource: message },
            qrdesk_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            qrdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
