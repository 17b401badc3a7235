//! IEEE 802.2 LLC and SNAP.
//!
//! LLC is not reached through a type code: MAC layers that carry an 802.3
//! length call [`dissect_llc`] directly. From here, UI frames dispatch on the
//! DSAP; SNAP frames dispatch on the PID, in the Ethertype space when the OUI
//! says the PID is an Ethertype and in the SNAP PID space otherwise.

pub mod layout;
pub mod parser;

pub use parser::{dissect_llc, snap_code};
