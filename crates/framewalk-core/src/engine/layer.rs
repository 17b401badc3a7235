use serde::Serialize;

/// Rendered description of one decoded protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub protocol: &'static str,
    /// Absolute frame offset where the layer's header starts.
    pub offset: usize,
    pub summary: String,
    /// Per-field or per-record lines, filled at higher verbosity.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    /// Marker for a record sequence that was abandoned inside this layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

impl Layer {
    pub fn new(protocol: &'static str, offset: usize, summary: impl Into<String>) -> Self {
        Self {
            protocol,
            offset,
            summary: summary.into(),
            details: Vec::new(),
            marker: None,
        }
    }

    pub fn detail(&mut self, line: impl Into<String>) {
        self.details.push(line.into());
    }
}

/// Handle to a layer already pushed onto a dissection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRef(pub(crate) usize);
