// Schema variants of the broker REST surface.
//
// A standalone chassis and a clustered (CTE) deployment expose the same
// resources under different paths, with different identifier types and
// different names for the membership list fields. Everything above this
// module addresses fields through `FieldKeys` and never by literal name.

use serde::{Deserialize, Serialize};

/// Which vocabulary a device speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Schema {
    /// Single chassis: integer ids, `P<nn>` port names, `/api/ports`.
    Standalone,
    /// Cluster of chassis: UUID string ids, `S<b>-P<nn>` names, `/api/cte_ports`.
    Clustered,
}

/// Field names used in port and filter records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKeys {
    pub identifier: &'static str,
    pub name: &'static str,
    pub mode: &'static str,
    pub enabled: &'static str,
    pub source_ports: &'static str,
    pub dest_ports: &'static str,
    pub source_filters: &'static str,
    pub dest_filters: &'static str,
}

pub const STANDALONE_KEYS: FieldKeys = FieldKeys {
    identifier: "id",
    name: "name",
    mode: "mode",
    enabled: "enabled",
    source_ports: "source_port_list",
    dest_ports: "dest_port_list",
    source_filters: "source_filter_list",
    dest_filters: "dest_filter_list",
};

pub const CLUSTERED_KEYS: FieldKeys = FieldKeys {
    identifier: "uuid",
    name: "name",
    mode: "mode",
    enabled: "enabled",
    source_ports: "source_port_uuid_list",
    dest_ports: "dest_port_uuid_list",
    source_filters: "source_filter_uuid_list",
    dest_filters: "dest_filter_uuid_list",
};

impl Schema {
    /// The field vocabulary for this variant.
    pub fn keys(self) -> &'static FieldKeys {
        match self {
            Self::Standalone => &STANDALONE_KEYS,
            Self::Clustered => &CLUSTERED_KEYS,
        }
    }

    /// Collection path (below `/api/`) for port resources.
    pub fn ports_path(self) -> &'static str {
        match self {
            Self::Standalone => "ports",
            Self::Clustered => "cte_ports",
        }
    }

    /// Collection path (below `/api/`) for filter resources.
    pub fn filters_path(self) -> &'static str {
        match self {
            Self::Standalone => "filters",
            Self::Clustered => "cte_filters",
        }
    }
}

/// Path of the clustering-capability resource. Only clustered
/// deployments answer it successfully.
pub const CLUSTER_PATH: &str = "cte_cluster";
