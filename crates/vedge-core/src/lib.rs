//! Port–filter mapping engine and topology synchronizer for Vision Edge
//! packet brokers.
//!
//! - **[`Driver`]** — Facade exposing the caller operations: login,
//!   topology discovery, bidirectional/unidirectional/tap mappings and
//!   clearing. [`Driver::oneshot()`] wraps one operation in a scoped
//!   session for CLI use.
//!
//! - **[`Session`]** — Fault-tolerant gateway. Authenticates lazily,
//!   resolves the device's schema variant once per session, and retries a
//!   call up to [`MAX_ATTEMPTS`] times when the session expires. Generic
//!   over [`Connector`] / [`DeviceApi`] so it runs against the HTTP client
//!   ([`HttpConnector`]) or an in-memory device.
//!
//! - **[`MappingEngine`]** — Creates and deletes `PASS_ALL` filters, keeping
//!   each port enabled exactly while it is a member of some filter.
//!
//! - **Domain model** ([`model`]) — [`DeviceId`], typed record views,
//!   [`CanonicalAddress`] and the [`Chassis`] tree produced by discovery.

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod mapping;
pub mod model;
pub mod port_name;
pub mod schema;
pub mod session;
pub mod topology;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceConfig, LoginDetails, TlsVerification};
pub use device::HttpConnector;
pub use driver::{Driver, STATE_ID};
pub use error::CoreError;
pub use mapping::MappingEngine;
pub use session::{Connector, DeviceApi, MAX_ATTEMPTS, Session, SessionState};

pub use model::{
    Blade, CanonicalAddress, Chassis, DeviceId, FilterRecord, PortLocation, PortNode, PortRecord,
};

pub use vedge_api::Schema;
