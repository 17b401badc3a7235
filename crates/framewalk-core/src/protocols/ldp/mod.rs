//! Label Distribution Protocol.
//!
//! A TCP segment or UDP datagram may carry several PDUs; each gets its own
//! layer. Inside a PDU, messages are a TLV sequence whose bodies are in turn
//! TLV sequences of parameters.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::dissect_ldp;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::TcpPort, u64::from(layout::PORT_LDP), "ldp", dissect_ldp)?;
    registry.register(LayerId::UdpPort, u64::from(layout::PORT_LDP), "ldp", dissect_ldp)
}
