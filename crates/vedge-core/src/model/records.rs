// ── Typed views over device records ──
//
// Raw records are read exclusively through the schema's `FieldKeys`, so
// nothing here knows whether a list is called `source_filter_list` or
// `source_filter_uuid_list`.
//
// Membership direction follows the device: a port's `dest_filters` are the
// filters its traffic flows into (the port is the filter's source), and its
// `source_filters` are the filters that feed it (the port is a destination).

use serde_json::Value;
use vedge_api::{FilterMode, PortMode, Record, Schema};

use super::device_id::DeviceId;

/// A port as seen through one schema variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub id: Option<DeviceId>,
    pub name: Option<String>,
    pub mode: Option<PortMode>,
    pub enabled: Option<bool>,
    /// Filters feeding this port.
    pub source_filters: Vec<DeviceId>,
    /// Filters this port feeds.
    pub dest_filters: Vec<DeviceId>,
}

impl PortRecord {
    pub fn from_record(schema: Schema, record: &Record) -> Self {
        let keys = schema.keys();
        Self {
            id: record
                .get(keys.identifier)
                .and_then(|v| DeviceId::from_value(schema, v)),
            name: record
                .get(keys.name)
                .and_then(Value::as_str)
                .map(str::to_owned),
            mode: record
                .get(keys.mode)
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            enabled: record.get(keys.enabled).and_then(Value::as_bool),
            source_filters: DeviceId::list_from_value(schema, record.get(keys.source_filters)),
            dest_filters: DeviceId::list_from_value(schema, record.get(keys.dest_filters)),
        }
    }

    /// Every filter the port participates in, without duplicates, in
    /// source-list then destination-list order.
    pub fn filters(&self) -> Vec<DeviceId> {
        let mut out: Vec<DeviceId> = Vec::with_capacity(self.membership_count());
        for id in self.source_filters.iter().chain(&self.dest_filters) {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    pub fn membership_count(&self) -> usize {
        self.source_filters.len() + self.dest_filters.len()
    }

    pub fn is_unmapped(&self) -> bool {
        self.membership_count() == 0
    }
}

/// A filter as seen through one schema variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRecord {
    pub id: Option<DeviceId>,
    pub mode: Option<FilterMode>,
    pub source_ports: Vec<DeviceId>,
    pub dest_ports: Vec<DeviceId>,
}

impl FilterRecord {
    pub fn from_record(schema: Schema, record: &Record) -> Self {
        let keys = schema.keys();
        Self {
            id: record
                .get(keys.identifier)
                .and_then(|v| DeviceId::from_value(schema, v)),
            mode: record
                .get(keys.mode)
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
            source_ports: DeviceId::list_from_value(schema, record.get(keys.source_ports)),
            dest_ports: DeviceId::list_from_value(schema, record.get(keys.dest_ports)),
        }
    }

    /// All endpoint ports, sources first, without duplicates.
    pub fn endpoints(&self) -> Vec<DeviceId> {
        let mut out: Vec<DeviceId> = Vec::new();
        for id in self.source_ports.iter().chain(&self.dest_ports) {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// The mapping edge this filter stands for: first source and first
    /// destination. Further members are not modeled.
    pub fn primary_edge(&self) -> Option<(&DeviceId, &DeviceId)> {
        Some((self.source_ports.first()?, self.dest_ports.first()?))
    }
}
