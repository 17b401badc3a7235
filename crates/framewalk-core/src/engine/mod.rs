//! Generic dissection engine.
//!
//! - `cursor`: bounded reads over captured bytes
//! - `tlv`: type-length-value sequence walking
//! - `registry`: `(layer, code) -> dissector` table
//! - `context`: per-frame state threaded through dispatch
//!
//! Protocol modules only ever touch bytes through [`Cursor`] and hand off to
//! the next layer through [`Dissection::dispatch`].

pub mod context;
pub mod cursor;
pub mod error;
mod fallback;
pub mod frame;
pub mod layer;
pub mod registry;
pub mod tlv;

pub use context::{AddressingContext, Dissection, LinkAddress, MAX_DISPATCH_DEPTH};
pub use cursor::Cursor;
pub use error::{DissectError, Outcome, Truncated, corruption_marker, truncation_marker};
pub use frame::FrameView;
pub use layer::{Layer, LayerRef};
pub use registry::{
    DissectFn, DissectorEntry, LayerId, Registry, RegistryError, TypeCode, builtin_registry,
};
pub use tlv::{
    Endian, FieldWidth, FixedTlv, LengthMode, OptionTlv, Terminator, TlvError, TlvHeader,
    TlvLayout, TlvRecord, TlvWalker,
};
