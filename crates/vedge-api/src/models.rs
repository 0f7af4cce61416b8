// REST payload types
//
// Port and filter payloads are kept as raw JSON objects because their key
// names depend on the schema variant; `vedge-core` reads them through
// `FieldKeys`. Only the enumeration values are shared between variants.

use serde::{Deserialize, Serialize};

/// A port or filter object as returned by the device.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Port operating mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PortMode {
    /// Port both receives and forwards traffic; used while mapped.
    Bidirectional,
    /// Ingress-only network port; the resting mode of an unmapped port.
    Network,
    /// Egress-only tool port.
    Tool,
}

/// Filter matching mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterMode {
    /// Forward everything; the only mode used for plain mappings.
    PassAll,
    DenyAll,
    PassByCriteria,
    DenyByCriteria,
}
