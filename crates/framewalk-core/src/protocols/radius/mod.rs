//! RADIUS authentication, accounting and dynamic authorization.

pub mod layout;
pub mod parser;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::dissect_radius;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    for port in layout::PORTS {
        registry.register(LayerId::UdpPort, u64::from(*port), "radius", dissect_radius)?;
    }
    Ok(())
}
