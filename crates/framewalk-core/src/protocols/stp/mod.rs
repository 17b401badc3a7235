//! IEEE 802.1D/w/s bridge protocol data units.
//!
//! Config, TCN and RSTP BPDUs are fixed records; an MSTP BPDU adds a
//! configuration digest and a list of 16-byte MSTI records sized by its v3
//! length field.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};
use crate::protocols::llc::snap_code;

pub use parser::dissect_stp;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::LlcSap, u64::from(layout::SAP_STP), "stp", dissect_stp)?;
    registry.register(
        LayerId::SnapPid,
        snap_code(layout::OUI_IEEE_8021, layout::PID_BPDU),
        "stp",
        dissect_stp,
    )
}
