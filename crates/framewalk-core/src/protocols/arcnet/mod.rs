//! ARCNET link headers.
//!
//! Old-style types carry a 3-byte header (source, destination, type); every
//! other type adds a split flag and sequence id, with a longer exception form
//! when the flag is 0xff. Only unfragmented packets and first fragments carry
//! an upper-layer header, so later fragments are rendered as data.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::{Fragment, dissect_arcnet, dissect_arcnet_linux, is_legacy_type};

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::LinkType, u64::from(layout::LINKTYPE_ARCNET_BSD), "arcnet", dissect_arcnet)?;
    registry.register(
        LayerId::LinkType,
        u64::from(layout::LINKTYPE_ARCNET_LINUX),
        "arcnet",
        dissect_arcnet_linux,
    )
}
