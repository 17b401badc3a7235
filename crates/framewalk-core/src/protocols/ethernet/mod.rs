//! Ethernet II / 802.3 MAC framing and 802.1Q VLAN tags.
//!
//! The MAC addresses are stored in the addressing context for layers that
//! need them later (ARP, LLC).

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::{dissect_ethernet, dissect_vlan};

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::LinkType, u64::from(layout::LINKTYPE_ETHERNET), "ether", dissect_ethernet)?;
    for ethertype in [
        layout::ETHERTYPE_8021Q,
        layout::ETHERTYPE_8021AD,
        layout::ETHERTYPE_QINQ_LEGACY,
    ] {
        registry.register(LayerId::Ethertype, u64::from(ethertype), "vlan", dissect_vlan)?;
    }
    Ok(())
}
