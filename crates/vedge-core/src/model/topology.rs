// ── Discovered resource tree ──
//
// Chassis → blade → port, rebuilt on every discovery. Mapping edges are
// stored on the destination port as the location of its source port, a
// plain key into the same tree rather than a pointer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::address::PortLocation;
use super::device_id::DeviceId;

pub const CHASSIS_ID: &str = "1";
pub const CHASSIS_MODEL: &str = "Ixia Vision Edge Chassis";
pub const BLADE_MODEL: &str = "Generic L1 Module";
pub const PORT_MODEL: &str = "Generic L1 Port";

/// Root of a discovery result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chassis {
    pub id: String,
    pub address: String,
    pub model_name: String,
    pub blades: BTreeMap<u32, Blade>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blade {
    pub id: u32,
    pub model_name: String,
    pub ports: BTreeMap<u32, PortNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortNode {
    pub id: u32,
    /// Full caller-facing address, `<device>/<blade>/<port>`.
    pub address: String,
    pub model_name: String,
    /// Device-native name (`P07`, `S1-P07`).
    pub device_name: String,
    /// Remote identifier, when the device reported one.
    pub remote_id: Option<DeviceId>,
    /// Location of the port this one receives its mapping from.
    pub mapped_from: Option<PortLocation>,
}

impl Chassis {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            id: CHASSIS_ID.to_owned(),
            address: address.into(),
            model_name: CHASSIS_MODEL.to_owned(),
            blades: BTreeMap::new(),
        }
    }

    /// Insert a port node, creating its blade on first encounter.
    pub fn insert_port(
        &mut self,
        location: PortLocation,
        device_name: impl Into<String>,
        remote_id: Option<DeviceId>,
    ) {
        let address = format!("{}/{location}", self.address);
        let blade = self.blades.entry(location.blade).or_insert_with(|| Blade {
            id: location.blade,
            model_name: BLADE_MODEL.to_owned(),
            ports: BTreeMap::new(),
        });
        blade.ports.insert(
            location.port,
            PortNode {
                id: location.port,
                address,
                model_name: PORT_MODEL.to_owned(),
                device_name: device_name.into(),
                remote_id,
                mapped_from: None,
            },
        );
    }

    pub fn port(&self, location: PortLocation) -> Option<&PortNode> {
        self.blades.get(&location.blade)?.ports.get(&location.port)
    }

    pub fn port_mut(&mut self, location: PortLocation) -> Option<&mut PortNode> {
        self.blades
            .get_mut(&location.blade)?
            .ports
            .get_mut(&location.port)
    }

    /// Record `source → dest`. A later edge into the same destination
    /// replaces the earlier one.
    pub fn set_mapping(&mut self, source: PortLocation, dest: PortLocation) -> bool {
        if self.port(source).is_none() {
            return false;
        }
        match self.port_mut(dest) {
            Some(node) => {
                node.mapped_from = Some(source);
                true
            }
            None => false,
        }
    }

    /// All port nodes with their locations, in blade/port order.
    pub fn ports(&self) -> impl Iterator<Item = (PortLocation, &PortNode)> {
        self.blades.values().flat_map(|blade| {
            blade
                .ports
                .values()
                .map(move |node| (PortLocation::new(blade.id, node.id), node))
        })
    }

    /// All derived mapping edges as `(source, destination)`.
    pub fn mappings(&self) -> Vec<(PortLocation, PortLocation)> {
        self.ports()
            .filter_map(|(loc, node)| node.mapped_from.map(|src| (src, loc)))
            .collect()
    }

    pub fn port_count(&self) -> usize {
        self.blades.values().map(|b| b.ports.len()).sum()
    }
}
