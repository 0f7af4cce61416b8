// ── Schema adapter ──
//
// Resolves which vocabulary a device speaks and builds the request bodies
// the engine sends, always through the resolved `FieldKeys`.

use serde_json::Value;
use tracing::debug;
use vedge_api::{FilterMode, PortMode, Record, Schema};

use crate::model::DeviceId;
use crate::session::DeviceApi;

/// Probe the clustering capability. Any failure, access errors included,
/// means the device is a standalone chassis.
pub async fn resolve<A: DeviceApi>(api: &A) -> Schema {
    match api.probe_cluster().await {
        Ok(()) => {
            debug!("cluster probe succeeded");
            Schema::Clustered
        }
        Err(e) => {
            debug!(error = %e, "cluster probe failed, assuming standalone");
            Schema::Standalone
        }
    }
}

/// Body that enables (`BIDIRECTIONAL`) or disables (`NETWORK`) a port.
pub fn port_state_request(schema: Schema, enabled: bool) -> Record {
    let keys = schema.keys();
    let mode = if enabled {
        PortMode::Bidirectional
    } else {
        PortMode::Network
    };
    let mut body = Record::new();
    body.insert(keys.mode.into(), Value::from(mode.as_ref()));
    body.insert(keys.enabled.into(), Value::Bool(enabled));
    body
}

/// Body of a plain `source → dest` mapping filter.
pub fn pass_all_filter_request(schema: Schema, source: &DeviceId, dest: &DeviceId) -> Record {
    let keys = schema.keys();
    let mut body = Record::new();
    body.insert(
        keys.source_ports.into(),
        Value::Array(vec![source.to_value()]),
    );
    body.insert(keys.dest_ports.into(), Value::Array(vec![dest.to_value()]));
    body.insert(keys.mode.into(), Value::from(FilterMode::PassAll.as_ref()));
    body
}
