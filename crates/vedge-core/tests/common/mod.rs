// In-memory packet broker for engine tests.
//
// Keeps ports and filters like the device does: a port's filter lists are
// derived from filter membership on every read, so they can never drift.
// A port is listed under `dest_filter_list` of the filters it feeds and
// under `source_filter_list` of the filters feeding it.
//
// Every resource call yields once before touching state, so operations
// sharing a driver get the chance to interleave.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Value, json};
use vedge_api::{FilterMode, PortMode, Record, Schema};
use vedge_core::{Connector, DeviceApi, Driver, LoginDetails};

pub const DEVICE: &str = "broker";

#[derive(Debug, Clone)]
struct FakePort {
    id: u64,
    uuid: String,
    name: String,
    mode: PortMode,
    enabled: bool,
}

#[derive(Debug, Clone)]
struct FakeFilter {
    id: u64,
    uuid: String,
    mode: FilterMode,
    sources: Vec<u64>,
    dests: Vec<u64>,
}

#[derive(Debug, Default)]
struct State {
    clustered: bool,
    ports: BTreeMap<u64, FakePort>,
    filters: BTreeMap<u64, FakeFilter>,
    next_filter: u64,
    generation: u64,
    logins: u32,
    logouts: u32,
    probes: u32,
    reject_logins: bool,
    always_expired: bool,
    creates_left: Option<usize>,
    anonymous: Option<u64>,
    requests: Vec<String>,
}

/// Shared fake device. Clone the `Arc` into connectors and assertions.
#[derive(Debug, Default)]
pub struct FakeBroker {
    state: Mutex<State>,
}

impl FakeBroker {
    /// Standalone chassis with ports `P01..=P<count>`. Port ids are offset
    /// from port numbers so the two cannot be confused.
    pub fn standalone(count: u32) -> Arc<Self> {
        let broker = Self::default();
        for p in 1..=count {
            broker.add_port(&format!("P{p:02}"));
        }
        Arc::new(broker)
    }

    /// Cluster with `blades` blades of `ports` ports each (`S<b>-P<nn>`).
    pub fn clustered(blades: u32, ports: u32) -> Arc<Self> {
        let broker = Self::default();
        broker.lock().clustered = true;
        for b in 1..=blades {
            for p in 1..=ports {
                broker.add_port(&format!("S{b}-P{p:02}"));
            }
        }
        Arc::new(broker)
    }

    /// Empty device of the given kind.
    pub fn empty(clustered: bool) -> Arc<Self> {
        let broker = Self::default();
        broker.lock().clustered = clustered;
        Arc::new(broker)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_port(&self, name: &str) {
        let mut state = self.lock();
        let id = 100 + u64::try_from(state.ports.len()).unwrap();
        state.ports.insert(
            id,
            FakePort {
                id,
                uuid: format!("port-uuid-{id}"),
                name: name.to_owned(),
                mode: PortMode::Network,
                enabled: false,
            },
        );
    }

    /// Create a mapping filter directly on the device, enabling both ends.
    pub fn seed_filter(&self, source: &str, dest: &str) {
        let mut state = self.lock();
        let src = state.port_by_name(source).unwrap();
        let dst = state.port_by_name(dest).unwrap();
        for id in [src, dst] {
            let port = state.ports.get_mut(&id).unwrap();
            port.enabled = true;
            port.mode = PortMode::Bidirectional;
        }
        state.insert_filter(vec![src], vec![dst], FilterMode::PassAll);
    }

    /// Filter with an arbitrary member list, ports left as they are.
    pub fn seed_raw_filter(&self, sources: &[&str], dests: &[&str]) {
        let mut state = self.lock();
        let sources = sources
            .iter()
            .map(|n| state.port_by_name(n).unwrap())
            .collect();
        let dests = dests
            .iter()
            .map(|n| state.port_by_name(n).unwrap())
            .collect();
        state.insert_filter(sources, dests, FilterMode::PassAll);
    }

    // ── Fault injection ──────────────────────────────────────────────

    /// Invalidate every open session token.
    pub fn expire_sessions(&self) {
        self.lock().generation += 1;
    }

    pub fn set_reject_logins(&self, reject: bool) {
        self.lock().reject_logins = reject;
    }

    /// Every request fails with an expired session.
    pub fn set_always_expired(&self, expired: bool) {
        self.lock().always_expired = expired;
    }

    /// Let `n` more filter creations succeed, then fail with HTTP 500.
    pub fn fail_filter_creation_after(&self, n: usize) {
        self.lock().creates_left = Some(n);
    }

    /// Serve the full record of `name` without its `id`/`uuid`.
    pub fn hide_identity(&self, name: &str) {
        let mut state = self.lock();
        state.anonymous = state.port_by_name(name);
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn logins(&self) -> u32 {
        self.lock().logins
    }

    pub fn logouts(&self) -> u32 {
        self.lock().logouts
    }

    pub fn probes(&self) -> u32 {
        self.lock().probes
    }

    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        let state = self.lock();
        let id = state.port_by_name(name).unwrap();
        state.ports[&id].enabled
    }

    pub fn mode(&self, name: &str) -> PortMode {
        let state = self.lock();
        let id = state.port_by_name(name).unwrap();
        state.ports[&id].mode
    }

    pub fn memberships(&self, name: &str) -> usize {
        let state = self.lock();
        let id = state.port_by_name(name).unwrap();
        state
            .filters
            .values()
            .filter(|f| f.sources.contains(&id) || f.dests.contains(&id))
            .count()
    }

    pub fn filter_count(&self) -> usize {
        self.lock().filters.len()
    }

    /// `(source name, dest name)` per filter, first members only.
    pub fn edges(&self) -> Vec<(String, String)> {
        let state = self.lock();
        let mut edges: Vec<_> = state
            .filters
            .values()
            .filter_map(|f| {
                let src = &state.ports[f.sources.first()?].name;
                let dst = &state.ports[f.dests.first()?].name;
                Some((src.clone(), dst.clone()))
            })
            .collect();
        edges.sort();
        edges
    }

    /// Ports whose enabled flag disagrees with their membership.
    pub fn enablement_violations(&self) -> Vec<String> {
        let names: Vec<String> = self.lock().ports.values().map(|p| p.name.clone()).collect();
        names
            .into_iter()
            .filter(|n| self.is_enabled(n) != (self.memberships(n) > 0))
            .collect()
    }
}

impl State {
    fn port_by_name(&self, name: &str) -> Option<u64> {
        self.ports
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.id)
    }

    fn insert_filter(&mut self, sources: Vec<u64>, dests: Vec<u64>, mode: FilterMode) -> u64 {
        self.next_filter += 1;
        let id = self.next_filter;
        self.filters.insert(
            id,
            FakeFilter {
                id,
                uuid: format!("filter-uuid-{id}"),
                mode,
                sources,
                dests,
            },
        );
        id
    }

    fn schema(&self) -> Schema {
        if self.clustered {
            Schema::Clustered
        } else {
            Schema::Standalone
        }
    }

    /// Reject requests on a stale token or through the wrong vocabulary.
    fn admit(
        &mut self,
        generation: u64,
        schema: Schema,
        request: String,
    ) -> Result<(), vedge_api::Error> {
        self.requests.push(request.clone());
        if self.always_expired || generation != self.generation {
            return Err(vedge_api::Error::SessionExpired);
        }
        if schema != self.schema() {
            return Err(vedge_api::Error::NotFound { path: request });
        }
        Ok(())
    }

    fn port_key(&self, key: &str) -> Option<u64> {
        let by_id = self.ports.values().find(|p| match self.schema() {
            Schema::Standalone => key.parse::<u64>().is_ok_and(|id| id == p.id),
            Schema::Clustered => p.uuid == key,
        });
        by_id.map(|p| p.id).or_else(|| self.port_by_name(key))
    }

    fn filter_key(&self, key: &str) -> Option<u64> {
        self.filters
            .values()
            .find(|f| match self.schema() {
                Schema::Standalone => key.parse::<u64>().is_ok_and(|id| id == f.id),
                Schema::Clustered => f.uuid == key,
            })
            .map(|f| f.id)
    }

    fn port_ref(&self, id: u64) -> Value {
        match self.schema() {
            Schema::Standalone => json!(id),
            Schema::Clustered => json!(self.ports[&id].uuid),
        }
    }

    fn filter_ref(&self, id: u64) -> Value {
        match self.schema() {
            Schema::Standalone => json!(id),
            Schema::Clustered => json!(self.filters[&id].uuid),
        }
    }

    fn resolve_port_ref(&self, value: &Value) -> Option<u64> {
        match (self.schema(), value) {
            (Schema::Standalone, Value::Number(n)) => n.as_u64().filter(|id| self.ports.contains_key(id)),
            (Schema::Clustered, Value::String(s)) => {
                self.ports.values().find(|p| &p.uuid == s).map(|p| p.id)
            }
            _ => None,
        }
    }

    fn port_record(&self, id: u64, full: bool) -> Record {
        let port = &self.ports[&id];
        let keys = self.schema().keys();
        let mut rec = Record::new();
        rec.insert("id".into(), json!(port.id));
        if self.clustered {
            rec.insert("uuid".into(), json!(port.uuid));
        }
        rec.insert(keys.name.into(), json!(port.name));
        if !full {
            return rec;
        }
        if self.anonymous == Some(id) {
            rec.remove("id");
            rec.remove("uuid");
        }
        rec.insert(keys.mode.into(), json!(port.mode.as_ref()));
        rec.insert(keys.enabled.into(), json!(port.enabled));

        let feeding: Vec<Value> = self
            .filters
            .values()
            .filter(|f| f.dests.contains(&id))
            .map(|f| self.filter_ref(f.id))
            .collect();
        let fed: Vec<Value> = self
            .filters
            .values()
            .filter(|f| f.sources.contains(&id))
            .map(|f| self.filter_ref(f.id))
            .collect();
        rec.insert(keys.source_filters.into(), Value::Array(feeding));
        rec.insert(keys.dest_filters.into(), Value::Array(fed));
        rec
    }

    fn filter_record(&self, id: u64, full: bool) -> Record {
        let filter = &self.filters[&id];
        let keys = self.schema().keys();
        let mut rec = Record::new();
        rec.insert("id".into(), json!(filter.id));
        if self.clustered {
            rec.insert("uuid".into(), json!(filter.uuid));
        }
        if !full {
            return rec;
        }
        rec.insert(keys.mode.into(), json!(filter.mode.as_ref()));
        let sources = filter.sources.iter().map(|p| self.port_ref(*p)).collect();
        let dests = filter.dests.iter().map(|p| self.port_ref(*p)).collect();
        rec.insert(keys.source_ports.into(), Value::Array(sources));
        rec.insert(keys.dest_ports.into(), Value::Array(dests));
        rec
    }
}

// ── Gateway traits ───────────────────────────────────────────────────

/// One authenticated session on the fake device.
pub struct FakeApi {
    broker: Arc<FakeBroker>,
    generation: u64,
}

impl DeviceApi for FakeApi {
    async fn probe_cluster(&self) -> Result<(), vedge_api::Error> {
        let mut state = self.broker.lock();
        state.probes += 1;
        state.requests.push("GET cte_cluster".into());
        if state.clustered {
            Ok(())
        } else {
            Err(vedge_api::Error::Forbidden {
                message: "cluster not configured".into(),
            })
        }
    }

    async fn list_ports(&self, schema: Schema) -> Result<Vec<Record>, vedge_api::Error> {
        tokio::task::yield_now().await;
        let mut state = self.broker.lock();
        state.admit(self.generation, schema, format!("GET {}", schema.ports_path()))?;
        Ok(state.ports.keys().map(|id| state.port_record(*id, false)).collect())
    }

    async fn get_port(&self, schema: Schema, key: &str) -> Result<Record, vedge_api::Error> {
        tokio::task::yield_now().await;
        let mut state = self.broker.lock();
        let request = format!("GET {}/{key}", schema.ports_path());
        state.admit(self.generation, schema, request.clone())?;
        let id = state
            .port_key(key)
            .ok_or(vedge_api::Error::NotFound { path: request })?;
        Ok(state.port_record(id, true))
    }

    async fn modify_port(
        &self,
        schema: Schema,
        key: &str,
        body: &Record,
    ) -> Result<(), vedge_api::Error> {
        tokio::task::yield_now().await;
        let mut state = self.broker.lock();
        let request = format!("PUT {}/{key}", schema.ports_path());
        state.admit(self.generation, schema, request.clone())?;
        let id = state
            .port_key(key)
            .ok_or(vedge_api::Error::NotFound { path: request })?;
        let keys = schema.keys();
        let port = state.ports.get_mut(&id).unwrap();
        if let Some(mode) = body.get(keys.mode).and_then(Value::as_str) {
            port.mode = mode.parse().map_err(|_| vedge_api::Error::Api {
                status: 400,
                message: format!("bad mode {mode}"),
            })?;
        }
        if let Some(enabled) = body.get(keys.enabled).and_then(Value::as_bool) {
            port.enabled = enabled;
        }
        Ok(())
    }

    async fn list_filters(&self, schema: Schema) -> Result<Vec<Record>, vedge_api::Error> {
        tokio::task::yield_now().await;
        let mut state = self.broker.lock();
        state.admit(self.generation, schema, format!("GET {}", schema.filters_path()))?;
        Ok(state
            .filters
            .keys()
            .map(|id| state.filter_record(*id, false))
            .collect())
    }

    async fn get_filter(&self, schema: Schema, key: &str) -> Result<Record, vedge_api::Error> {
        tokio::task::yield_now().await;
        let mut state = self.broker.lock();
        let request = format!("GET {}/{key}", schema.filters_path());
        state.admit(self.generation, schema, request.clone())?;
        let id = state
            .filter_key(key)
            .ok_or(vedge_api::Error::NotFound { path: request })?;
        Ok(state.filter_record(id, true))
    }

    async fn create_filter(&self, schema: Schema, body: &Record) -> Result<Value, vedge_api::Error> {
        tokio::task::yield_now().await;
        let mut state = self.broker.lock();
        state.admit(self.generation, schema, format!("POST {}", schema.filters_path()))?;
        if let Some(left) = state.creates_left.as_mut() {
            if *left == 0 {
                return Err(vedge_api::Error::Api {
                    status: 500,
                    message: "filter table full".into(),
                });
            }
            *left -= 1;
        }

        let keys = schema.keys();
        let members = |key: &str| -> Result<Vec<u64>, vedge_api::Error> {
            body.get(key)
                .and_then(Value::as_array)
                .ok_or_else(|| vedge_api::Error::Api {
                    status: 400,
                    message: format!("missing {key}"),
                })?
                .iter()
                .map(|v| {
                    state.resolve_port_ref(v).ok_or_else(|| vedge_api::Error::Api {
                        status: 400,
                        message: format!("unknown port {v}"),
                    })
                })
                .collect()
        };
        let sources = members(keys.source_ports)?;
        let dests = members(keys.dest_ports)?;
        let mode = body
            .get(keys.mode)
            .and_then(Value::as_str)
            .and_then(|m| m.parse().ok())
            .unwrap_or(FilterMode::PassAll);

        let id = state.insert_filter(sources, dests, mode);
        Ok(json!({ "id": id }))
    }

    async fn delete_filter(&self, schema: Schema, key: &str) -> Result<(), vedge_api::Error> {
        tokio::task::yield_now().await;
        let mut state = self.broker.lock();
        let request = format!("DELETE {}/{key}", schema.filters_path());
        state.admit(self.generation, schema, request.clone())?;
        let id = state
            .filter_key(key)
            .ok_or(vedge_api::Error::NotFound { path: request })?;
        state.filters.remove(&id);
        Ok(())
    }

    async fn logout(&self) -> Result<(), vedge_api::Error> {
        self.broker.lock().logouts += 1;
        Ok(())
    }
}

/// Connector handing out sessions on one fake broker.
pub struct FakeConnector {
    broker: Arc<FakeBroker>,
}

impl FakeConnector {
    pub fn new(broker: &Arc<FakeBroker>) -> Self {
        Self {
            broker: Arc::clone(broker),
        }
    }
}

impl Connector for FakeConnector {
    type Api = FakeApi;

    async fn connect(&self, _login: &LoginDetails) -> Result<FakeApi, vedge_api::Error> {
        let mut state = self.broker.lock();
        state.logins += 1;
        if state.reject_logins {
            return Err(vedge_api::Error::Authentication {
                message: "invalid credentials".into(),
            });
        }
        Ok(FakeApi {
            broker: Arc::clone(&self.broker),
            generation: state.generation,
        })
    }
}

pub fn login() -> LoginDetails {
    LoginDetails::new(DEVICE, "admin", "admin".to_owned())
}

/// Driver logged in to `broker`.
pub fn driver(broker: &Arc<FakeBroker>) -> Driver<FakeConnector> {
    Driver::with_login(FakeConnector::new(broker), login())
}

/// Caller address of a port on the test device.
pub fn addr(blade: u32, port: u32) -> String {
    format!("{DEVICE}/{blade}/{port}")
}
