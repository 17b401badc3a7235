//! IPv4 header and options.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};
use crate::protocols::arcnet::layout as arcnet;

pub use parser::dissect_ipv4;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::Ethertype, u64::from(layout::ETHERTYPE_IPV4), "ip", dissect_ipv4)?;
    registry.register(LayerId::IpProto, u64::from(layout::IPPROTO_IPIP), "ip", dissect_ipv4)?;
    for arc_type in [arcnet::ARCTYPE_IP_OLD, arcnet::ARCTYPE_IP_OLD_ALT, arcnet::ARCTYPE_IP] {
        registry.register(LayerId::ArcnetType, u64::from(arc_type), "ip", dissect_ipv4)?;
    }
    Ok(())
}
