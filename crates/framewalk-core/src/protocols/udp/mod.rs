//! UDP datagrams.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::dissect_udp;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::IpProto, u64::from(layout::IPPROTO_UDP), "udp", dissect_udp)
}
