//! IEEE 802.3 slow protocols: LACP, Marker and link OAM.
//!
//! The Ethertype handler reads the subtype byte and dispatches on it, so a
//! new slow protocol only needs a `SlowSubtype` registration.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::{dissect_lacp, dissect_marker, dissect_oam, dissect_slow};

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::Ethertype, u64::from(layout::ETHERTYPE_SLOW), "slow", dissect_slow)?;
    registry.register(LayerId::SlowSubtype, u64::from(layout::SUBTYPE_LACP), "lacp", dissect_lacp)?;
    registry.register(
        LayerId::SlowSubtype,
        u64::from(layout::SUBTYPE_MARKER),
        "marker",
        dissect_marker,
    )?;
    registry.register(LayerId::SlowSubtype, u64::from(layout::SUBTYPE_OAM), "oam", dissect_oam)
}
