// ── Core error types ──
//
// Operation-level errors from vedge-core. Callers never see HTTP status
// codes or JSON parse failures directly; the `From<vedge_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Session is not configured: login details were never supplied")]
    NotConfigured,

    #[error("Authentication failed after {attempts} attempt(s): {message}")]
    AuthenticationFailed { attempts: u32, message: String },

    #[error("Cannot connect to device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Device request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Ports are not defined on {address}")]
    NoPorts { address: String },

    #[error("Invalid port address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("Operation not implemented: {operation}")]
    Unsupported { operation: String },

    /// A multi-step mapping failed partway; completed steps are not rolled back.
    #[error("Stopped after {completed} completed step(s) (last: {last_step})")]
    PartialMapping {
        completed: usize,
        last_step: String,
        #[source]
        source: Box<CoreError>,
    },

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

impl CoreError {
    /// Re-label a generic not-found as a specific entity.
    pub(crate) fn not_found_as(self, entity_type: &str, identifier: &str) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                entity_type: entity_type.into(),
                identifier: identifier.into(),
            },
            other => other,
        }
    }

    /// The error that actually stopped the operation, looking through
    /// partial-progress wrappers.
    pub fn root_cause(&self) -> &CoreError {
        match self {
            Self::PartialMapping { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vedge_api::Error> for CoreError {
    fn from(err: vedge_api::Error) -> Self {
        match err {
            vedge_api::Error::Authentication { message } => CoreError::AuthenticationFailed {
                attempts: 1,
                message,
            },
            vedge_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                attempts: 1,
                message: "Session expired -- re-authentication required".into(),
            },
            vedge_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            vedge_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vedge_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vedge_api::Error::Forbidden { message } => CoreError::Api {
                message: format!("access denied: {message}"),
                status: Some(403),
            },
            vedge_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: path,
            },
            vedge_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            vedge_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
