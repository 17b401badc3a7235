//! BGP-4 over TCP.
//!
//! A segment is a run of messages, each framed by the all-ones marker and
//! its own length; one layer is emitted per message. Bytes before a marker
//! are skipped, so a capture that starts mid-stream resynchronises on the
//! next message. A message whose body is inconsistent is marked and the walk
//! continues with the next message.
//!
//! UPDATE path attributes are walked with [`AttributeLayout`], whose length
//! field widens to two bytes when the extended-length flag is set.

pub mod layout;
pub mod parser;
mod update;

use crate::engine::{LayerId, Registry, RegistryError};

pub use parser::dissect_bgp;
pub use update::AttributeLayout;

pub(crate) fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(LayerId::TcpPort, u64::from(layout::PORT_BGP), "bgp", dissect_bgp)
}
