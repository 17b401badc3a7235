//! Linux cooked capture (SLL) link header.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::dissect_sll;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::LinkType, u64::from(layout::LINKTYPE_LINUX_SLL), "sll", dissect_sll)
}
