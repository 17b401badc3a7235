//! Address and code to display-name cache.
//!
//! Every binary address or protocol code a dissector prints goes through
//! [`NameCache::lookup_or_insert`] or [`NameCache::lookup_resolved`]. The
//! first lookup computes the display string (static seed table, optional
//! service table and resolver, numeric fallback) and stores it; later lookups
//! return the same shared string. Entries are never evicted.
//!
//! Whether hosts and ports are resolved is decided per lookup, by the
//! dissection's options, through a [`Names`] view.

pub mod format;
mod resolver;
mod seed;

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::warn;

pub use resolver::{HostsResolver, Resolver};

pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_millis(250);

/// Key space an address or code belongs to; equal bytes in different
/// families are different entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFamily {
    Ethernet,
    Ipv4,
    Ipv6,
    TcpPort,
    UdpPort,
    LlcSap,
    IpProto,
    Ethertype,
    Oui,
    Nsap,
    /// Opaque link-layer address of any length.
    Bytes,
}

impl AddressFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressFamily::Ethernet => "ethernet",
            AddressFamily::Ipv4 => "ipv4",
            AddressFamily::Ipv6 => "ipv6",
            AddressFamily::TcpPort => "tcp_port",
            AddressFamily::UdpPort => "udp_port",
            AddressFamily::LlcSap => "llc_sap",
            AddressFamily::IpProto => "ip_proto",
            AddressFamily::Ethertype => "ethertype",
            AddressFamily::Oui => "oui",
            AddressFamily::Nsap => "nsap",
            AddressFamily::Bytes => "bytes",
        }
    }

    fn resolvable(self) -> bool {
        matches!(
            self,
            AddressFamily::Ethernet
                | AddressFamily::Ipv4
                | AddressFamily::Ipv6
                | AddressFamily::TcpPort
                | AddressFamily::UdpPort
        )
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameCacheConfig {
    /// Upper bound on a single resolver call. After the first call that runs
    /// past it the resolver is no longer consulted.
    pub resolver_timeout: Duration,
}

impl Default for NameCacheConfig {
    fn default() -> Self {
        Self {
            resolver_timeout: DEFAULT_RESOLVER_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub resolver_calls: u64,
    pub resolver_timeouts: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    resolver_calls: AtomicU64,
    resolver_timeouts: AtomicU64,
}

type FamilyTable = HashMap<Box<[u8]>, Arc<str>>;

/// `(family, resolved)`: a resolved and a numeric name for the same address
/// are separate entries.
type TableKey = (AddressFamily, bool);

/// Process-lifetime map from `(family, key bytes)` to a display string.
///
/// Safe to share across threads; concurrent first lookups of the same key
/// may both compute a name, but only one is stored and both callers get it.
pub struct NameCache {
    config: NameCacheConfig,
    resolver: Option<Arc<dyn Resolver>>,
    entries: RwLock<HashMap<TableKey, FamilyTable>>,
    counters: Counters,
    resolver_stalled: AtomicBool,
}

impl NameCache {
    pub fn new(config: NameCacheConfig) -> Self {
        Self {
            config,
            resolver: None,
            entries: RwLock::new(HashMap::new()),
            counters: Counters::default(),
            resolver_stalled: AtomicBool::new(false),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn config(&self) -> &NameCacheConfig {
        &self.config
    }

    /// Display string for `key`, computing and caching it on first use.
    /// Hosts and ports come out numeric.
    pub fn lookup_or_insert(&self, family: AddressFamily, key: &[u8]) -> Arc<str> {
        self.lookup(family, key, false)
    }

    /// Like [`NameCache::lookup_or_insert`], but hosts and ports are named
    /// from the service tables and the resolver when they can be.
    pub fn lookup_resolved(&self, family: AddressFamily, key: &[u8]) -> Arc<str> {
        self.lookup(family, key, true)
    }

    /// View that resolves hosts and ports when `resolve` is set.
    pub fn names(&self, resolve: bool) -> Names<'_> {
        Names {
            cache: self,
            resolve,
        }
    }

    pub fn numeric(&self) -> Names<'_> {
        self.names(false)
    }

    pub fn resolving(&self) -> Names<'_> {
        self.names(true)
    }

    fn lookup(&self, family: AddressFamily, key: &[u8], resolve: bool) -> Arc<str> {
        let table = (family, resolve && family.resolvable());
        if let Some(name) = self
            .entries
            .read()
            .get(&table)
            .and_then(|entries| entries.get(key))
        {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(name);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let computed: Arc<str> = self.compute(family, key, table.1).into();
        let mut entries = self.entries.write();
        let stored = entries
            .entry(table)
            .or_default()
            .entry(Box::from(key))
            .or_insert(computed);
        Arc::clone(stored)
    }

    pub fn len(&self) -> usize {
        self.entries.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            resolver_calls: self.counters.resolver_calls.load(Ordering::Relaxed),
            resolver_timeouts: self.counters.resolver_timeouts.load(Ordering::Relaxed),
        }
    }

    fn compute(&self, family: AddressFamily, key: &[u8], resolve: bool) -> String {
        if let Some(name) = seeded_name(family, key) {
            return name.to_string();
        }
        if resolve {
            if let Some(name) = service_name(family, key) {
                return name.to_string();
            }
            if let Some(name) = self.resolve_bounded(family, key) {
                return name;
            }
        }
        numeric_form(family, key)
    }

    fn resolve_bounded(&self, family: AddressFamily, key: &[u8]) -> Option<String> {
        let resolver = Arc::clone(self.resolver.as_ref()?);
        // A resolver that hung once holds a thread; do not feed it more.
        if self.resolver_stalled.load(Ordering::Relaxed) {
            return None;
        }
        self.counters.resolver_calls.fetch_add(1, Ordering::Relaxed);

        let (tx, rx) = mpsc::sync_channel(1);
        let owned = key.to_vec();
        let spawned = thread::Builder::new()
            .name("framewalk-resolver".to_string())
            .spawn(move || {
                let _ = tx.send(resolver.resolve(family, &owned));
            });
        if let Err(err) = spawned {
            warn!(%family, error = %err, "failed to start resolver thread");
            return None;
        }

        match rx.recv_timeout(self.config.resolver_timeout) {
            Ok(name) => name,
            Err(RecvTimeoutError::Timeout) => {
                self.counters.resolver_timeouts.fetch_add(1, Ordering::Relaxed);
                self.resolver_stalled.store(true, Ordering::Relaxed);
                warn!(
                    %family,
                    timeout_ms = self.config.resolver_timeout.as_millis() as u64,
                    "name resolution timed out, resolver disabled for the rest of the run"
                );
                None
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Name lookups with the resolution policy of one dissection.
#[derive(Clone, Copy)]
pub struct Names<'a> {
    cache: &'a NameCache,
    resolve: bool,
}

impl<'a> Names<'a> {
    pub fn cache(&self) -> &'a NameCache {
        self.cache
    }

    pub fn resolves(&self) -> bool {
        self.resolve
    }

    pub fn lookup(&self, family: AddressFamily, key: &[u8]) -> Arc<str> {
        self.cache.lookup(family, key, self.resolve)
    }

    pub fn mac(&self, address: &[u8; 6]) -> Arc<str> {
        self.lookup(AddressFamily::Ethernet, address)
    }

    pub fn ipv4(&self, address: &[u8; 4]) -> Arc<str> {
        self.lookup(AddressFamily::Ipv4, address)
    }

    pub fn ipv6(&self, address: &[u8; 16]) -> Arc<str> {
        self.lookup(AddressFamily::Ipv6, address)
    }

    pub fn tcp_port(&self, port: u16) -> Arc<str> {
        self.lookup(AddressFamily::TcpPort, &port.to_be_bytes())
    }

    pub fn udp_port(&self, port: u16) -> Arc<str> {
        self.lookup(AddressFamily::UdpPort, &port.to_be_bytes())
    }

    pub fn llc_sap(&self, sap: u8) -> Arc<str> {
        self.lookup(AddressFamily::LlcSap, &[sap])
    }

    pub fn ip_proto(&self, proto: u8) -> Arc<str> {
        self.lookup(AddressFamily::IpProto, &[proto])
    }

    pub fn ethertype(&self, ethertype: u16) -> Arc<str> {
        self.lookup(AddressFamily::Ethertype, &ethertype.to_be_bytes())
    }

    pub fn oui(&self, oui: u32) -> Arc<str> {
        let bytes = oui.to_be_bytes();
        self.lookup(AddressFamily::Oui, &bytes[1..])
    }

    pub fn nsap(&self, address: &[u8]) -> Arc<str> {
        self.lookup(AddressFamily::Nsap, address)
    }
}

impl fmt::Debug for Names<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Names").field("resolve", &self.resolve).finish()
    }
}

impl fmt::Debug for NameCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameCache")
            .field("config", &self.config)
            .field("has_resolver", &self.resolver.is_some())
            .field("resolver_stalled", &self.resolver_stalled.load(Ordering::Relaxed))
            .field("entries", &self.len())
            .finish()
    }
}

impl Default for NameCache {
    fn default() -> Self {
        Self::new(NameCacheConfig::default())
    }
}

fn u16_key(key: &[u8]) -> Option<u16> {
    key.try_into().ok().map(u16::from_be_bytes)
}

fn seeded_name(family: AddressFamily, key: &[u8]) -> Option<&'static str> {
    match family {
        AddressFamily::Ethernet => {
            let address: [u8; 6] = key.try_into().ok()?;
            seed::find(seed::ETHERNET_ADDRESSES, address)
        }
        AddressFamily::LlcSap => match key {
            [sap] => seed::find(seed::LLC_SAPS, *sap),
            _ => None,
        },
        AddressFamily::IpProto => match key {
            [proto] => seed::find(seed::IP_PROTOCOLS, *proto),
            _ => None,
        },
        AddressFamily::Ethertype => seed::find(seed::ETHERTYPES, u16_key(key)?),
        AddressFamily::Oui => {
            let bytes: [u8; 3] = key.try_into().ok()?;
            let oui = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
            seed::find(seed::OUIS, oui)
        }
        _ => None,
    }
}

fn service_name(family: AddressFamily, key: &[u8]) -> Option<&'static str> {
    match family {
        AddressFamily::TcpPort => seed::find(seed::TCP_SERVICES, u16_key(key)?),
        AddressFamily::UdpPort => seed::find(seed::UDP_SERVICES, u16_key(key)?),
        _ => None,
    }
}

fn numeric_form(family: AddressFamily, key: &[u8]) -> String {
    let formatted = match family {
        AddressFamily::Ethernet => format::format_mac(key),
        AddressFamily::Ipv4 => format::format_ipv4(key),
        AddressFamily::Ipv6 => format::format_ipv6(key),
        AddressFamily::TcpPort | AddressFamily::UdpPort => format::format_port(key),
        AddressFamily::LlcSap => match key {
            [sap] => Some(format!("0x{sap:02x}")),
            _ => None,
        },
        AddressFamily::IpProto => match key {
            [proto] => Some(format!("ip-proto-{proto}")),
            _ => None,
        },
        AddressFamily::Ethertype => u16_key(key).map(|value| format!("0x{value:04x}")),
        // Callers print the numeric OUI next to its name.
        AddressFamily::Oui => match key {
            [_, _, _] => Some("Unknown".to_string()),
            _ => None,
        },
        AddressFamily::Nsap => Some(format::format_nsap(key)),
        AddressFamily::Bytes => None,
    };
    formatted.unwrap_or_else(|| format::format_bytes(key))
}
