use std::sync::Arc;

use crate::config::{DissectOptions, Verbosity};
use crate::names::{AddressFamily, NameCache, Names};

use super::cursor::Cursor;
use super::error::{DissectError, corruption_marker};
use super::fallback;
use super::layer::{Layer, LayerRef};
use super::registry::{DissectFn, LayerId, Registry, TypeCode};

/// Deepest chain of nested dispatches accepted for one frame.
pub const MAX_DISPATCH_DEPTH: usize = 24;

/// Link-layer address captured once at the MAC layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAddress {
    Ethernet([u8; 6]),
    Arcnet(u8),
    /// Variable-length hardware address (Linux cooked capture), up to 8 bytes.
    Cooked { len: u8, bytes: [u8; 8] },
}

impl LinkAddress {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            LinkAddress::Ethernet(bytes) => bytes,
            LinkAddress::Arcnet(byte) => std::slice::from_ref(byte),
            LinkAddress::Cooked { len, bytes } => &bytes[..usize::from(*len).min(bytes.len())],
        }
    }

    pub fn family(&self) -> AddressFamily {
        match self {
            LinkAddress::Ethernet(_) => AddressFamily::Ethernet,
            LinkAddress::Arcnet(_) | LinkAddress::Cooked { .. } => AddressFamily::Bytes,
        }
    }
}

/// Values a lower layer hands to layers decoded later in the same frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressingContext {
    pub link_src: Option<LinkAddress>,
    pub link_dst: Option<LinkAddress>,
}

/// Per-frame decoding state threaded through every dissector.
///
/// Replaces ambient globals: the registry, the name cache and the rendering
/// options are reached through this value, and decoded layers accumulate in it.
pub struct Dissection<'r> {
    registry: &'r Registry,
    names: &'r NameCache,
    options: &'r DissectOptions,
    pub addressing: AddressingContext,
    layers: Vec<Layer>,
    depth: usize,
    short_capture: bool,
}

impl<'r> Dissection<'r> {
    pub fn new(registry: &'r Registry, names: &'r NameCache, options: &'r DissectOptions) -> Self {
        Self {
            registry,
            names,
            options,
            addressing: AddressingContext::default(),
            layers: Vec::new(),
            depth: 0,
            short_capture: false,
        }
    }

    /// Mark the frame as captured with fewer bytes than it had on the wire.
    pub fn with_short_capture(mut self, short: bool) -> Self {
        self.short_capture = short;
        self
    }

    /// Whether running out of bytes may be the capture's snap length rather
    /// than a length field that lies.
    pub fn capture_is_short(&self) -> bool {
        self.short_capture
    }

    pub fn options(&self) -> &DissectOptions {
        self.options
    }

    pub fn verbosity(&self) -> Verbosity {
        self.options.verbosity
    }

    pub fn verbose(&self) -> bool {
        self.options.verbosity >= Verbosity::Verbose
    }

    /// Name lookups, resolving hosts and ports when the options ask for it.
    pub fn names(&self) -> Names<'r> {
        self.names.names(self.options.resolve_names)
    }

    pub fn name(&self, family: AddressFamily, key: &[u8]) -> Arc<str> {
        self.names().lookup(family, key)
    }

    pub fn link_name(&self, address: &LinkAddress) -> Arc<str> {
        self.names().lookup(address.family(), address.as_bytes())
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn can_dispatch(&self, layer: LayerId, code: TypeCode) -> bool {
        self.registry.contains(layer, code)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn push_layer(&mut self, layer: Layer) -> LayerRef {
        self.layers.push(layer);
        LayerRef(self.layers.len() - 1)
    }

    pub fn layer_mut(&mut self, layer: LayerRef) -> &mut Layer {
        &mut self.layers[layer.0]
    }

    /// Add a detail line to `layer` when running verbose.
    pub fn detail(&mut self, layer: LayerRef, line: impl Into<String>) {
        if self.verbose() {
            self.layers[layer.0].detail(line);
        }
    }

    /// Record a corrupt record sequence on `layer` without failing the frame.
    /// The first marker on a layer is kept.
    pub fn mark_corrupt(&mut self, layer: LayerRef, err: &DissectError) {
        tracing::debug!(error = %err, "record sequence abandoned");
        let layer = &mut self.layers[layer.0];
        if layer.marker.is_some() {
            return;
        }
        let reason = match err {
            DissectError::Corrupt { reason, .. } => reason.as_str(),
            DissectError::Truncated { .. } => "truncated",
        };
        layer.marker = Some(corruption_marker(layer.protocol, reason));
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    /// Hand `payload` to the dissector registered for `(layer, code)`.
    ///
    /// Unregistered codes are rendered as raw payload and consume it entirely;
    /// they are never an error.
    pub fn dispatch(
        &mut self,
        layer: LayerId,
        code: TypeCode,
        payload: Cursor<'_>,
    ) -> Result<usize, DissectError> {
        let registry = self.registry;
        let Some(entry) = registry.lookup(layer, code) else {
            tracing::trace!(%layer, code, "no dissector registered, rendering raw payload");
            return Ok(fallback::render_unknown(self, layer, code, payload));
        };
        self.call(entry.name, entry.handler, payload)
    }

    /// Run a dissector chosen by the caller rather than by a type code, such
    /// as the 802.2 header behind an 802.3 length field.
    pub fn call(
        &mut self,
        name: &'static str,
        handler: DissectFn,
        payload: Cursor<'_>,
    ) -> Result<usize, DissectError> {
        if self.depth >= MAX_DISPATCH_DEPTH {
            let reason = format!("encapsulation nested deeper than {MAX_DISPATCH_DEPTH} layers");
            return Err(DissectError::corrupt(payload.offset(), reason).within(name));
        }
        self.depth += 1;
        let result = handler(payload, self);
        self.depth -= 1;
        result.map_err(|err| err.within(name))
    }

    /// Render `payload` as data with no further dispatch.
    pub fn raw_payload(&mut self, payload: Cursor<'_>) -> usize {
        fallback::render_data(self, payload)
    }
}
