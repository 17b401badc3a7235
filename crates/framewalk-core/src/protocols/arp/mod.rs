//! ARP / RARP / InARP.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};
use crate::protocols::arcnet::layout as arcnet;

pub use parser::dissect_arp;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::Ethertype, u64::from(layout::ETHERTYPE_ARP), "arp", dissect_arp)?;
    registry.register(LayerId::Ethertype, u64::from(layout::ETHERTYPE_REVARP), "rarp", dissect_arp)?;
    for arc_type in [arcnet::ARCTYPE_ARP_OLD, arcnet::ARCTYPE_ARP, arcnet::ARCTYPE_REVARP] {
        registry.register(LayerId::ArcnetType, u64::from(arc_type), "arp", dissect_arp)?;
    }
    Ok(())
}
