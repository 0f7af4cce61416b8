// ── Driver facade ──
//
// The operations an orchestration caller uses. Addresses arrive as
// `"<device>/<blade>/<port>"` strings and are parsed here; everything
// below works on typed addresses.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::LoginDetails;
use crate::error::CoreError;
use crate::mapping::MappingEngine;
use crate::model::{CanonicalAddress, Chassis};
use crate::session::{Connector, Session, SessionState};
use crate::topology;

/// State id reported to callers; synchronization ids are not tracked.
pub const STATE_ID: i64 = -1;

/// Entry point for driving one packet broker.
///
/// Cheaply cloneable; clones share one session gateway.
pub struct Driver<C: Connector> {
    session: Arc<Session<C>>,
}

impl<C: Connector> Clone for Driver<C> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<C: Connector> Driver<C> {
    /// A driver with no login details yet. Call [`login`](Self::login)
    /// before any device operation.
    pub fn new(connector: C) -> Self {
        Self {
            session: Arc::new(Session::new(connector)),
        }
    }

    pub fn with_login(connector: C, login: LoginDetails) -> Self {
        Self {
            session: Arc::new(Session::with_login(connector, login)),
        }
    }

    /// The underlying session gateway.
    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    pub async fn session_state(&self) -> SessionState {
        self.session.state().await
    }

    /// Store login details. Authentication happens on the first device call.
    pub async fn login(&self, login: LoginDetails) {
        info!(address = %login.address, "login");
        self.session.set_login_details(login).await;
    }

    pub async fn discover_topology(&self, address: &str) -> Result<Chassis, CoreError> {
        topology::discover(&self.session, address).await
    }

    pub async fn map_bidi(&self, a: &str, b: &str) -> Result<(), CoreError> {
        let a = parse_address(a)?;
        let b = parse_address(b)?;
        self.engine().map_bidirectional(&a, &b).await
    }

    pub async fn map_uni<S: AsRef<str>>(&self, source: &str, dests: &[S]) -> Result<(), CoreError> {
        let source = parse_address(source)?;
        let dests = parse_addresses(dests)?;
        self.engine().map_unidirectional(&source, &dests).await
    }

    /// Tap mappings are plain unidirectional mappings.
    pub async fn map_tap<S: AsRef<str>>(&self, source: &str, dests: &[S]) -> Result<(), CoreError> {
        self.map_uni(source, dests).await
    }

    pub async fn clear_all<S: AsRef<str>>(&self, addresses: &[S]) -> Result<(), CoreError> {
        let addresses = parse_addresses(addresses)?;
        self.engine().clear_all(&addresses).await
    }

    pub async fn clear_to<S: AsRef<str>>(&self, source: &str, dests: &[S]) -> Result<(), CoreError> {
        let source = parse_address(source)?;
        let dests = parse_addresses(dests)?;
        self.engine().clear_to(&source, &dests).await
    }

    pub async fn get_attribute_value(
        &self,
        _address: &str,
        _attribute: &str,
    ) -> Result<Value, CoreError> {
        Err(unsupported("get_attribute_value"))
    }

    pub async fn set_attribute_value(
        &self,
        _address: &str,
        _attribute: &str,
        _value: &str,
    ) -> Result<(), CoreError> {
        Err(unsupported("set_attribute_value"))
    }

    pub async fn set_speed_manual(
        &self,
        _source: &str,
        _dest: &str,
        _speed: &str,
        _duplex: &str,
    ) -> Result<(), CoreError> {
        Err(unsupported("set_speed_manual"))
    }

    pub fn state_id(&self) -> i64 {
        STATE_ID
    }

    /// Accepted for interface compatibility; the value is not stored.
    pub fn set_state_id(&self, state_id: i64) {
        debug!(state_id, "ignoring state id");
    }

    /// Log out of the current session, if any.
    pub async fn close(&self) {
        self.session.close().await;
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Run `f` inside a scoped session: login details are set up front and
    /// the session is logged out afterwards, whatever `f` returned.
    pub async fn oneshot<F, Fut, T>(connector: C, login: LoginDetails, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Driver<C>) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let driver = Self::with_login(connector, login);
        let result = f(driver.clone()).await;
        driver.close().await;
        result
    }

    fn engine(&self) -> MappingEngine<'_, C> {
        MappingEngine::new(&self.session)
    }
}

fn parse_address(address: &str) -> Result<CanonicalAddress, CoreError> {
    address.parse()
}

fn parse_addresses<S: AsRef<str>>(addresses: &[S]) -> Result<Vec<CanonicalAddress>, CoreError> {
    addresses.iter().map(|a| parse_address(a.as_ref())).collect()
}

fn unsupported(operation: &str) -> CoreError {
    CoreError::Unsupported {
        operation: operation.into(),
    }
}
