// vedge-api: Async Rust client for the Vision Edge packet broker REST API

pub mod auth;
pub mod client;
pub mod cluster;
pub mod error;
pub mod filters;
pub mod models;
pub mod ports;
pub mod schema;
pub mod transport;

pub use client::BrokerClient;
pub use error::Error;
pub use models::{FilterMode, PortMode, Record};
pub use schema::{FieldKeys, Schema};
pub use transport::{TlsMode, TransportConfig};
