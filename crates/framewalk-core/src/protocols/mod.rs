//! Protocol dissectors.
//!
//! Each protocol follows a layered structure:
//! - `layout`: wire constants, header sizes and name tables (source of truth)
//! - `parser`: decoding through the bounded cursor, recording layers and
//!   dispatching onward
//! - `mod`: the `(layer, code)` pairs the protocol claims in the registry
//!
//! Parsers never index bytes directly and never perform I/O. A protocol
//! reached only by an explicit call (802.2 LLC behind an 802.3 length field)
//! registers nothing.

pub mod arcnet;
pub mod arp;
pub mod bgp;
pub(crate) mod common;
pub mod eigrp;
pub mod ethernet;
pub mod ipv4;
pub mod ipv6;
pub mod ldp;
pub mod llc;
pub mod radius;
pub mod raw;
pub mod sll;
pub mod slow;
pub mod stp;
pub mod tcp;
pub mod udp;

use crate::engine::{Registry, RegistryError};

/// Add every built-in dissector to `registry`.
pub fn register_all(registry: &mut Registry) -> Result<(), RegistryError> {
    ethernet::register(registry)?;
    arcnet::register(registry)?;
    raw::register(registry)?;
    sll::register(registry)?;
    arp::register(registry)?;
    ipv4::register(registry)?;
    ipv6::register(registry)?;
    tcp::register(registry)?;
    udp::register(registry)?;
    slow::register(registry)?;
    stp::register(registry)?;
    ldp::register(registry)?;
    bgp::register(registry)?;
    radius::register(registry)?;
    eigrp::register(registry)
}
