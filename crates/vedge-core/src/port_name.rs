// ── Port name codec ──
//
// Pure translation between device-native port names and blade/port
// locations. Standalone chassis name ports `P07` and have a single blade;
// clusters name them `S1-P07`. Matching is case-insensitive and must cover
// the whole name.

use vedge_api::Schema;

use crate::model::address::{CanonicalAddress, PortLocation, parse_index};

/// Blade index every standalone port lives on.
pub const STANDALONE_BLADE: u32 = 1;

/// Split a device port name into its location, or `None` when the name does
/// not follow the schema's pattern.
pub fn decompose(schema: Schema, name: &str) -> Option<PortLocation> {
    match schema {
        Schema::Standalone => {
            let port = strip_prefix_ci(name, 'P')?;
            Some(PortLocation::new(STANDALONE_BLADE, parse_index(port)?))
        }
        Schema::Clustered => {
            let rest = strip_prefix_ci(name, 'S')?;
            let (blade, port) = rest.split_once('-')?;
            let port = strip_prefix_ci(port, 'P')?;
            Some(PortLocation::new(parse_index(blade)?, parse_index(port)?))
        }
    }
}

/// Build the device port name for a location. The port index is padded to
/// two digits; the blade prefix is only emitted for clusters.
pub fn compose(schema: Schema, location: PortLocation) -> String {
    match schema {
        Schema::Standalone => format!("P{:02}", location.port),
        Schema::Clustered => format!("S{}-P{:02}", location.blade, location.port),
    }
}

/// Device port name for a caller address.
pub fn from_canonical_address(schema: Schema, address: &CanonicalAddress) -> String {
    compose(schema, address.location)
}

fn strip_prefix_ci(s: &str, prefix: char) -> Option<&str> {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&prefix) => Some(chars.as_str()),
        _ => None,
    }
}
