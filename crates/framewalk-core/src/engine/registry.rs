use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use thiserror::Error;

use super::context::Dissection;
use super::cursor::Cursor;
use super::error::DissectError;

/// Key within a [`LayerId`] numbering space. Wide enough for a SNAP
/// `(OUI, PID)` pair.
pub type TypeCode = u64;

/// Independent numbering spaces a type code can belong to.
///
/// Codes overlap numerically across spaces (0x0800 is IPv4 as an Ethertype,
/// and port 2048 as a UDP port), so every lookup is keyed by the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    /// pcap link-layer header type (DLT/LINKTYPE).
    LinkType,
    Ethertype,
    LlcSap,
    /// SNAP `(OUI << 16) | PID` for OUIs that do not encapsulate Ethertypes.
    /// The full 24-bit OUI is kept, so the key needs 40 bits.
    SnapPid,
    ArcnetType,
    IpProto,
    TcpPort,
    UdpPort,
    /// IEEE 802.3 slow-protocol subtype (LACP, Marker, OAM).
    SlowSubtype,
}

impl LayerId {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::LinkType => "linktype",
            LayerId::Ethertype => "ethertype",
            LayerId::LlcSap => "llc-sap",
            LayerId::SnapPid => "snap-pid",
            LayerId::ArcnetType => "arcnet-type",
            LayerId::IpProto => "ip-proto",
            LayerId::TcpPort => "tcp-port",
            LayerId::UdpPort => "udp-port",
            LayerId::SlowSubtype => "slow-subtype",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dissector decodes one layer from `payload` and returns how many bytes of
/// it were consumed, including whatever inner layers it dispatched to.
pub type DissectFn = fn(Cursor<'_>, &mut Dissection<'_>) -> Result<usize, DissectError>;

#[derive(Debug, Clone, Copy)]
pub struct DissectorEntry {
    pub layer: LayerId,
    pub code: TypeCode,
    pub name: &'static str,
    pub handler: DissectFn,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{layer} {code:#06x} already handled by {existing}, cannot register {name}")]
    Duplicate {
        layer: LayerId,
        code: TypeCode,
        existing: &'static str,
        name: &'static str,
    },
}

/// Table of `(layer, code) -> dissector`, filled once before decoding starts.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<(LayerId, TypeCode), DissectorEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every dissector shipped with this crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        crate::protocols::register_all(&mut registry)?;
        tracing::debug!(entries = registry.len(), "built-in dissector registry ready");
        Ok(registry)
    }

    pub fn register(
        &mut self,
        layer: LayerId,
        code: TypeCode,
        name: &'static str,
        handler: DissectFn,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = self.entries.get(&(layer, code)) {
            return Err(RegistryError::Duplicate {
                layer,
                code,
                existing: existing.name,
                name,
            });
        }
        self.entries.insert(
            (layer, code),
            DissectorEntry {
                layer,
                code,
                name,
                handler,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, layer: LayerId, code: TypeCode) -> Option<&DissectorEntry> {
        self.entries.get(&(layer, code))
    }

    pub fn contains(&self, layer: LayerId, code: TypeCode) -> bool {
        self.entries.contains_key(&(layer, code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in `(layer, code)` order.
    pub fn entries(&self) -> Vec<&DissectorEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|entry| (entry.layer, entry.code));
        entries
    }
}

/// Process-wide built-in registry, built on first use and never mutated.
///
/// # Panics
/// Panics if two built-in protocol modules claim the same `(layer, code)`;
/// that is a programming error, not an input condition.
pub fn builtin_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| match Registry::builtin() {
        Ok(registry) => registry,
        Err(err) => panic!("built-in dissector table is inconsistent: {err}"),
    })
}
