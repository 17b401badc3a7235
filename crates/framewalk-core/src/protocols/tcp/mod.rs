//! TCP segments. Options are walked; the payload goes to whichever port has
//! a registered dissector.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::dissect_tcp;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::IpProto, u64::from(layout::IPPROTO_TCP), "tcp", dissect_tcp)
}
