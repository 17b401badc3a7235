//! Link types that carry a bare IP packet.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::{dissect_raw, dissect_raw_ipv4, dissect_raw_ipv6};

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::LinkType, u64::from(layout::LINKTYPE_RAW), "raw", dissect_raw)?;
    registry.register(LayerId::LinkType, u64::from(layout::LINKTYPE_IPV4), "raw", dissect_raw_ipv4)?;
    registry.register(LayerId::LinkType, u64::from(layout::LINKTYPE_IPV6), "raw", dissect_raw_ipv6)?;
    Ok(())
}
