// ── Caller-facing port addresses ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Blade and port index of a physical port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortLocation {
    pub blade: u32,
    pub port: u32,
}

impl PortLocation {
    pub fn new(blade: u32, port: u32) -> Self {
        Self { blade, port }
    }
}

impl fmt::Display for PortLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.blade, self.port)
    }
}

/// `"<device-address>/<blade>/<port>"`, e.g. `192.168.42.240/1/21`.
///
/// Only the trailing two segments identify the port; the device part is
/// carried along for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalAddress {
    pub device: String,
    pub location: PortLocation,
}

impl CanonicalAddress {
    pub fn new(device: impl Into<String>, location: PortLocation) -> Self {
        Self {
            device: device.into(),
            location,
        }
    }
}

impl FromStr for CanonicalAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidAddress {
            address: s.to_owned(),
            reason: reason.to_owned(),
        };

        let mut parts = s.trim().rsplitn(3, '/');
        let port = parts.next().unwrap_or_default();
        let blade = parts.next().ok_or_else(|| invalid("expected <device>/<blade>/<port>"))?;
        let device = parts.next().ok_or_else(|| invalid("expected <device>/<blade>/<port>"))?;

        let blade = parse_index(blade).ok_or_else(|| invalid("blade must be a positive integer"))?;
        let port = parse_index(port).ok_or_else(|| invalid("port must be a positive integer"))?;

        Ok(Self::new(device, PortLocation::new(blade, port)))
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device, self.location)
    }
}

/// Parse a positive decimal index, tolerating zero padding.
pub(crate) fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}
