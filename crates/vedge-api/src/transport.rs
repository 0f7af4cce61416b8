// Shared transport configuration for building reqwest::Client instances.
//
// Every login builds a fresh client from this config so TLS and timeout
// settings stay identical across re-authentication.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Default REST port of the packet broker's management plane.
pub const DEFAULT_API_PORT: u16 = 8000;

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (brokers ship with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Port used when the device address carries no scheme.
    pub api_port: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
            api_port: DEFAULT_API_PORT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("vedge/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Turn a bare device address into the REST base URL.
    ///
    /// `10.0.0.5` becomes `https://10.0.0.5:8000/`. An address that already
    /// carries an `http`/`https` scheme is used verbatim.
    pub fn base_url(&self, address: &str) -> Result<url::Url, Error> {
        let address = address.trim();
        if address.starts_with("http://") || address.starts_with("https://") {
            return Ok(url::Url::parse(address)?);
        }
        Ok(url::Url::parse(&format!(
            "https://{address}:{}/",
            self.api_port
        ))?)
    }
}
