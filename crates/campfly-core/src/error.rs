// ── Core error types ──
//
// User-facing errors from campfly-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<campfly_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach campaign service: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Campaign not found: {identifier}")]
    CampaignNotFound { identifier: String },

    #[error("Contact not found: {identifier}")]
    ContactNotFound { identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by service: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Service error: {message}")]
    Api {
        message: String,
        /// Service-specific error code (e.g. "campaign.not-found").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<campfly_api::Error> for CoreError {
    fn from(err: campfly_api::Error) -> Self {
        match err {
            campfly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            campfly_api::Error::PermissionDenied { message } => CoreError::Rejected { message },
            campfly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            campfly_api::Error::InvalidUrl(e) => CoreError::Internal(format!("invalid URL: {e}")),
            campfly_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            campfly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            campfly_api::Error::RateLimited { retry_after_secs } => CoreError::Api {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                code: Some("rate_limited".into()),
                status: Some(429),
            },
            campfly_api::Error::Service {
                message,
                code,
                status,
            } => match status {
                404 if code.as_deref() == Some("contact.not-found") => {
                    CoreError::ContactNotFound {
                        identifier: message,
                    }
                }
                404 => CoreError::CampaignNotFound {
                    identifier: message,
                },
                400 | 422 => CoreError::ValidationFailed { message },
                _ => CoreError::Api {
                    message,
                    code,
                    status: Some(status),
                },
            },
            campfly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
