use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A read needed more bytes than were captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("truncated at offset {offset}: need {needed} bytes, {available} captured")]
pub struct Truncated {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

/// Terminal state of one unit of dissection work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Decoded,
    Truncated,
    Corrupt,
}

/// Why a dissector stopped before the end of its layer.
///
/// `protocol` is filled in by the dispatcher with the innermost protocol that
/// was decoding when the error surfaced; handlers usually leave it empty and
/// just use `?` on cursor reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DissectError {
    #[error("{} truncated at offset {offset} (need {needed} bytes)", .protocol.unwrap_or("frame"))]
    Truncated {
        protocol: Option<&'static str>,
        offset: usize,
        needed: usize,
    },
    #[error("{} corrupt at offset {offset}: {reason}", .protocol.unwrap_or("frame"))]
    Corrupt {
        protocol: Option<&'static str>,
        offset: usize,
        reason: String,
    },
}

impl DissectError {
    pub fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        DissectError::Corrupt {
            protocol: None,
            offset,
            reason: reason.into(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            DissectError::Truncated { .. } => Outcome::Truncated,
            DissectError::Corrupt { .. } => Outcome::Corrupt,
        }
    }

    pub fn protocol(&self) -> Option<&'static str> {
        match self {
            DissectError::Truncated { protocol, .. } | DissectError::Corrupt { protocol, .. } => {
                *protocol
            }
        }
    }

    /// Attribute the error to `name` unless an inner layer already claimed it.
    pub fn within(mut self, name: &'static str) -> Self {
        match &mut self {
            DissectError::Truncated { protocol, .. } | DissectError::Corrupt { protocol, .. } => {
                if protocol.is_none() {
                    *protocol = Some(name);
                }
            }
        }
        self
    }

    /// Text marker appended to the frame's rendering.
    pub fn marker(&self) -> String {
        let protocol = self.protocol().unwrap_or("frame");
        match self {
            DissectError::Truncated { .. } => truncation_marker(protocol),
            DissectError::Corrupt { reason, .. } => corruption_marker(protocol, reason),
        }
    }
}

impl From<Truncated> for DissectError {
    fn from(value: Truncated) -> Self {
        DissectError::Truncated {
            protocol: None,
            offset: value.offset,
            needed: value.needed,
        }
    }
}

pub fn truncation_marker(protocol: &str) -> String {
    format!("[|{protocol}]")
}

pub fn corruption_marker(protocol: &str, reason: &str) -> String {
    format!("[{protocol}: invalid, {reason}]")
}
