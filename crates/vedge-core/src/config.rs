// ── Runtime connection configuration ──
//
// These types describe *how* to reach a packet broker. They carry
// credential data and connection tuning, but never touch disk.
// The CLI constructs a `DeviceConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use vedge_api::transport::{DEFAULT_API_PORT, TlsMode, TransportConfig};

/// Where and as whom to log in.
#[derive(Debug, Clone)]
pub struct LoginDetails {
    /// Device address (`10.0.0.5`) or full base URL (`https://broker:8000`).
    pub address: String,
    pub username: String,
    pub password: SecretString,
}

impl LoginDetails {
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Default: brokers ship with self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for talking to a single device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub login: LoginDetails,
    pub tls: TlsVerification,
    /// Per-request timeout, enforced by the transport.
    pub timeout: Duration,
    /// REST port used when the address carries no scheme.
    pub api_port: u16,
}

impl DeviceConfig {
    pub fn new(login: LoginDetails) -> Self {
        Self {
            login,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            api_port: DEFAULT_API_PORT,
        }
    }

    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            api_port: self.api_port,
        }
    }
}
