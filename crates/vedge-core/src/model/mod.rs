// ── Domain model ──
//
// Identifiers, typed record views, caller addresses and the discovered
// resource tree.

pub mod address;
pub mod device_id;
pub mod records;
pub mod topology;

pub use address::{CanonicalAddress, PortLocation};
pub use device_id::DeviceId;
pub use records::{FilterRecord, PortRecord};
pub use topology::{Blade, Chassis, PortNode};
