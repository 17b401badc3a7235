//! IPv6 header and the extension header chain.
//!
//! Hop-by-hop and destination options are walked as TLVs, routing headers
//! are skipped by length, and a non-initial fragment stops dispatch.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};
use crate::protocols::arcnet::layout as arcnet;

pub use parser::dissect_ipv6;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::Ethertype, u64::from(layout::ETHERTYPE_IPV6), "ip6", dissect_ipv6)?;
    registry.register(LayerId::IpProto, u64::from(layout::IPPROTO_IPV6), "ip6", dissect_ipv6)?;
    registry.register(LayerId::ArcnetType, u64::from(arcnet::ARCTYPE_INET6), "ip6", dissect_ipv6)
}
