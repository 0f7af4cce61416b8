// ── Topology synchronizer ──
//
// Rebuilds the chassis tree from the device's port and filter inventory.
// Nothing is cached between calls.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{Chassis, DeviceId, PortLocation};
use crate::port_name;
use crate::session::{Connector, Session};

/// Discover the resource tree of the device at `address`.
///
/// Ports whose names do not follow the active naming pattern are left out.
/// An empty port inventory is an error; an empty filter inventory is not.
pub async fn discover<C: Connector>(
    session: &Session<C>,
    address: &str,
) -> Result<Chassis, CoreError> {
    info!(address, "discovering topology");
    let _operation = session.exclusive().await;
    let ports = session.list_ports().await?;
    if ports.is_empty() {
        return Err(CoreError::NoPorts {
            address: address.to_owned(),
        });
    }
    let schema = session.schema().await?;

    let mut chassis = Chassis::new(address);
    let mut by_id: HashMap<DeviceId, PortLocation> = HashMap::with_capacity(ports.len());
    for port in ports {
        let Some(name) = port.name else {
            debug!(id = ?port.id, "port without a name, skipping");
            continue;
        };
        let Some(location) = port_name::decompose(schema, &name) else {
            debug!(%name, %schema, "port name outside the naming pattern, skipping");
            continue;
        };
        if let Some(id) = &port.id {
            by_id.insert(id.clone(), location);
        }
        chassis.insert_port(location, name, port.id);
    }

    let filters = session.list_filters().await?;
    debug!(count = filters.len(), "resolving filter edges");
    for summary in filters {
        let Some(filter_id) = summary.id else {
            continue;
        };
        let filter = session
            .get_filter(&filter_id)
            .await
            .map_err(|e| e.not_found_as("filter", &filter_id.as_key()))?;
        let Some((src, dst)) = filter.primary_edge() else {
            continue;
        };
        if let (Some(&from), Some(&to)) = (by_id.get(src), by_id.get(dst)) {
            chassis.set_mapping(from, to);
        }
    }

    info!(
        blades = chassis.blades.len(),
        ports = chassis.port_count(),
        "topology discovered"
    );
    Ok(chassis)
}
