//! Cisco EIGRP.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::dissect_eigrp;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::IpProto, u64::from(layout::IP_PROTO_EIGRP), "eigrp", dissect_eigrp)
}
