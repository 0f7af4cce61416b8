//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use vedge_config::ConfigError;
use vedge_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to device at {url}: {reason}")]
    #[diagnostic(
        code(vedge::connection_failed),
        help(
            "Check that the device is reachable and its REST API is enabled.\n\
             If it uses a self-signed certificate, pass --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(vedge::timeout),
        help("Increase timeout with --timeout or check device responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed after {attempts} attempt(s): {message}")]
    #[diagnostic(
        code(vedge::auth_failed),
        help(
            "Verify the username and password for this device.\n\
             Run: vedge config set-password --profile <name>"
        )
    )]
    AuthFailed { attempts: u32, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(vedge::no_credentials),
        help(
            "Set VEDGE_USERNAME and VEDGE_PASSWORD, pass --username,\n\
             or store a password with: vedge config set-password"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(vedge::not_found),
        help("Run: vedge discover to see the ports defined on the device")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("Ports are not defined on {address}")]
    #[diagnostic(code(vedge::no_ports))]
    NoPorts { address: String },

    // ── Mapping ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(vedge::partial_mapping),
        help(
            "{completed} step(s) completed before the failure (last: {last_step}).\n\
             Completed steps were not rolled back; run vedge discover to inspect."
        )
    )]
    PartialMapping {
        message: String,
        completed: usize,
        last_step: String,
        exit: i32,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(vedge::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    #[error("{0}")]
    #[diagnostic(code(vedge::internal))]
    Internal(String),

    // ── Unsupported ──────────────────────────────────────────────────
    #[error("Operation '{operation}' is not implemented by this driver")]
    #[diagnostic(
        code(vedge::unsupported),
        help("Vision Edge devices do not expose this operation through their REST API.")
    )]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vedge::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No device configured")]
    #[diagnostic(
        code(vedge::no_config),
        help(
            "Pass --device (or set VEDGE_DEVICE), or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(vedge::config))]
    Config(String),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(vedge::keyring))]
    Keyring(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(vedge::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::NoPorts { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            Self::PartialMapping { exit, .. } => *exit,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotConfigured => CliError::NoConfig {
                path: vedge_config::config_path().display().to_string(),
            },

            CoreError::AuthenticationFailed { attempts, message } => {
                CliError::AuthFailed { attempts, message }
            }

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
            },

            CoreError::NoPorts { address } => CliError::NoPorts { address },

            CoreError::InvalidAddress { address, reason } => CliError::Validation {
                field: format!("address '{address}'"),
                reason,
            },

            CoreError::InvalidState { message } => CliError::Internal(message),

            CoreError::Unsupported { operation } => CliError::Unsupported { operation },

            partial @ CoreError::PartialMapping { .. } => {
                let message = partial.root_cause().to_string();
                let CoreError::PartialMapping {
                    completed,
                    last_step,
                    source,
                } = partial
                else {
                    return CliError::Internal(message);
                };
                // Exit with the code of the failure that stopped the run.
                let exit = CliError::from(*source).exit_code();
                CliError::PartialMapping {
                    message,
                    completed,
                    last_step,
                    exit,
                }
            }

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::Config(message),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}
