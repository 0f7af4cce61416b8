// ── Session gateway ──
//
// Owns the remote connection for one device. Authentication is lazy: the
// first call connects, resolves the schema variant and caches both. A call
// that fails with an auth-expired error drops the session and is retried
// against a fresh one, at most `MAX_ATTEMPTS` times. Each call runs under
// the session lock; multi-call operations additionally hold the operation
// lock (`exclusive`) so their request sequences never interleave.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use vedge_api::{Record, Schema};

use crate::config::LoginDetails;
use crate::error::CoreError;
use crate::model::{DeviceId, FilterRecord, PortRecord};
use crate::schema;

/// Attempts per logical call, the first one included.
pub const MAX_ATTEMPTS: u32 = 3;

/// The remote operations the engine consumes.
///
/// Implemented by [`vedge_api::BrokerClient`] and by in-memory devices in
/// tests. Keys are identifiers in string form, or port names.
pub trait DeviceApi: Send + Sync + 'static {
    fn probe_cluster(&self) -> impl Future<Output = Result<(), vedge_api::Error>> + Send;

    fn list_ports(
        &self,
        schema: Schema,
    ) -> impl Future<Output = Result<Vec<Record>, vedge_api::Error>> + Send;

    fn get_port(
        &self,
        schema: Schema,
        key: &str,
    ) -> impl Future<Output = Result<Record, vedge_api::Error>> + Send;

    fn modify_port(
        &self,
        schema: Schema,
        key: &str,
        body: &Record,
    ) -> impl Future<Output = Result<(), vedge_api::Error>> + Send;

    fn list_filters(
        &self,
        schema: Schema,
    ) -> impl Future<Output = Result<Vec<Record>, vedge_api::Error>> + Send;

    fn get_filter(
        &self,
        schema: Schema,
        key: &str,
    ) -> impl Future<Output = Result<Record, vedge_api::Error>> + Send;

    fn create_filter(
        &self,
        schema: Schema,
        body: &Record,
    ) -> impl Future<Output = Result<Value, vedge_api::Error>> + Send;

    fn delete_filter(
        &self,
        schema: Schema,
        key: &str,
    ) -> impl Future<Output = Result<(), vedge_api::Error>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), vedge_api::Error>> + Send;
}

/// Opens authenticated sessions.
pub trait Connector: Send + Sync + 'static {
    type Api: DeviceApi;

    /// Connect and authenticate. Rejected credentials must surface as an
    /// auth-expired error so the gateway counts them as an attempt.
    fn connect(
        &self,
        login: &LoginDetails,
    ) -> impl Future<Output = Result<Self::Api, vedge_api::Error>> + Send;
}

/// Where the gateway is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

struct Inner<A> {
    login: Option<LoginDetails>,
    api: Option<Arc<A>>,
    schema: Option<Schema>,
    state: SessionState,
}

impl<A> Inner<A> {
    fn drop_session(&mut self) -> Option<Arc<A>> {
        self.schema = None;
        self.state = SessionState::Unauthenticated;
        self.api.take()
    }
}

/// Fault-tolerant gateway onto one device.
pub struct Session<C: Connector> {
    connector: C,
    inner: Mutex<Inner<C::Api>>,
    operation: Mutex<()>,
}

impl<C: Connector> Session<C> {
    /// A gateway without login details. Every call fails with
    /// [`CoreError::NotConfigured`] until they are supplied.
    pub fn new(connector: C) -> Self {
        Self::build(connector, None)
    }

    pub fn with_login(connector: C, login: LoginDetails) -> Self {
        Self::build(connector, Some(login))
    }

    fn build(connector: C, login: Option<LoginDetails>) -> Self {
        Self {
            connector,
            inner: Mutex::new(Inner {
                login,
                api: None,
                schema: None,
                state: SessionState::Unauthenticated,
            }),
            operation: Mutex::new(()),
        }
    }

    /// Serialize a whole operation against every other one on this gateway.
    /// Hold the guard across all the calls that make up the operation.
    pub(crate) async fn exclusive(&self) -> MutexGuard<'_, ()> {
        self.operation.lock().await
    }

    /// Store (or replace) the login details. Any open session is closed so
    /// the next call authenticates against the new target.
    pub async fn set_login_details(&self, login: LoginDetails) {
        let mut inner = self.inner.lock().await;
        debug!(address = %login.address, username = %login.username, "login details set");
        inner.login = Some(login);
        if let Some(api) = inner.drop_session() {
            release(&*api).await;
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// The schema variant of the current session, establishing it if needed.
    pub async fn schema(&self) -> Result<Schema, CoreError> {
        self.call("resolve_schema", |_, schema| async move { Ok(schema) })
            .await
    }

    /// Run one logical remote call.
    ///
    /// `f` may be invoked up to [`MAX_ATTEMPTS`] times, each time with a
    /// freshly established session after an auth-expired failure. Any other
    /// failure is returned as is.
    pub async fn call<T, F, Fut>(&self, operation: &str, mut f: F) -> Result<T, CoreError>
    where
        F: FnMut(Arc<C::Api>, Schema) -> Fut,
        Fut: Future<Output = Result<T, vedge_api::Error>>,
    {
        let mut inner = self.inner.lock().await;
        let Some(login) = inner.login.clone() else {
            return Err(CoreError::NotConfigured);
        };

        let mut last_error = None;
        for attempt in 1..=MAX_ATTEMPTS {
            let (api, schema) = match self.establish(&mut inner, &login).await {
                Ok(pair) => pair,
                Err(e) if e.is_auth_expired() => {
                    warn!(operation, attempt, error = %e, "authentication rejected");
                    last_error = Some(e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match f(api, schema).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_auth_expired() => {
                    debug!(operation, attempt, "session expired, re-authenticating");
                    inner.drop_session();
                    inner.state = SessionState::Authenticating;
                    last_error = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        inner.state = SessionState::Unauthenticated;
        Err(CoreError::AuthenticationFailed {
            attempts: MAX_ATTEMPTS,
            message: last_error.map_or_else(String::new, |e| e.to_string()),
        })
    }

    async fn establish(
        &self,
        inner: &mut Inner<C::Api>,
        login: &LoginDetails,
    ) -> Result<(Arc<C::Api>, Schema), vedge_api::Error> {
        if let (Some(api), Some(schema)) = (&inner.api, inner.schema) {
            return Ok((Arc::clone(api), schema));
        }

        inner.state = SessionState::Authenticating;
        debug!(address = %login.address, "authenticating");
        let api = match self.connector.connect(login).await {
            Ok(api) => Arc::new(api),
            Err(e) => {
                inner.state = SessionState::Unauthenticated;
                return Err(e);
            }
        };

        let schema = schema::resolve(api.as_ref()).await;
        debug!(%schema, "session established");
        inner.api = Some(Arc::clone(&api));
        inner.schema = Some(schema);
        inner.state = SessionState::Authenticated;
        Ok((api, schema))
    }

    /// Log out and forget the current session. Login details are kept, so
    /// a later call opens a new session.
    pub async fn close(&self) {
        let api = self.inner.lock().await.drop_session();
        if let Some(api) = api {
            release(&*api).await;
        }
    }

    // ── Typed remote operations ──────────────────────────────────────

    pub async fn list_ports(&self) -> Result<Vec<PortRecord>, CoreError> {
        self.call("list_ports", |api, schema| async move {
            let records = api.list_ports(schema).await?;
            Ok(records
                .iter()
                .map(|r| PortRecord::from_record(schema, r))
                .collect())
        })
        .await
    }

    /// Fetch one port by identifier or device name.
    pub async fn get_port(&self, key: &str) -> Result<PortRecord, CoreError> {
        self.call("get_port", |api, schema| async move {
            let record = api.get_port(schema, key).await?;
            Ok(PortRecord::from_record(schema, &record))
        })
        .await
    }

    pub async fn set_port_enabled(&self, id: &DeviceId, enabled: bool) -> Result<(), CoreError> {
        let key = id.as_key();
        self.call("modify_port", |api, schema| {
            let key = key.clone();
            async move {
                let body = schema::port_state_request(schema, enabled);
                api.modify_port(schema, &key, &body).await
            }
        })
        .await
    }

    pub async fn list_filters(&self) -> Result<Vec<FilterRecord>, CoreError> {
        self.call("list_filters", |api, schema| async move {
            let records = api.list_filters(schema).await?;
            Ok(records
                .iter()
                .map(|r| FilterRecord::from_record(schema, r))
                .collect())
        })
        .await
    }

    pub async fn get_filter(&self, id: &DeviceId) -> Result<FilterRecord, CoreError> {
        let key = id.as_key();
        self.call("get_filter", |api, schema| {
            let key = key.clone();
            async move {
                let record = api.get_filter(schema, &key).await?;
                Ok(FilterRecord::from_record(schema, &record))
            }
        })
        .await
    }

    /// Create a `PASS_ALL` filter from `source` to `dest`.
    pub async fn create_pass_all_filter(
        &self,
        source: &DeviceId,
        dest: &DeviceId,
    ) -> Result<Value, CoreError> {
        self.call("create_filter", |api, schema| async move {
            let body = schema::pass_all_filter_request(schema, source, dest);
            api.create_filter(schema, &body).await
        })
        .await
    }

    pub async fn delete_filter(&self, id: &DeviceId) -> Result<(), CoreError> {
        let key = id.as_key();
        self.call("delete_filter", |api, schema| {
            let key = key.clone();
            async move { api.delete_filter(schema, &key).await }
        })
        .await
    }
}

impl<C: Connector> Drop for Session<C> {
    fn drop(&mut self) {
        let Some(api) = self.inner.get_mut().drop_session() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { release(&*api).await });
            }
            Err(_) => warn!("session dropped outside a runtime; logout skipped"),
        }
    }
}

async fn release<A: DeviceApi>(api: &A) {
    if let Err(e) = api.logout().await {
        warn!(error = %e, "logout failed");
    }
}
