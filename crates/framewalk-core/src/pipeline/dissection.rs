use serde::Serialize;

use crate::engine::{Layer, Outcome};

/// Everything rendered for one captured frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDissection {
    /// 1-based position of the frame in the capture.
    pub frame_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub captured_length: usize,
    pub wire_length: usize,
    /// Bytes accounted for by dissectors, or the offset where decoding stopped.
    pub consumed: usize,
    pub layers: Vec<Layer>,
    pub outcome: Outcome,
    /// Truncation or corruption marker for the frame as a whole.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

impl FrameDissection {
    /// Layers that abandoned a record sequence but let the frame continue.
    pub fn local_corruptions(&self) -> usize {
        self.layers.iter().filter(|layer| layer.marker.is_some()).count()
    }

    /// One summary line, followed by indented detail lines when any layer
    /// recorded them.
    ///
    /// # Examples
    /// ```
    /// use framewalk_core::engine::{Layer, Outcome};
    /// use framewalk_core::pipeline::FrameDissection;
    ///
    /// let frame = FrameDissection {
    ///     frame_number: 3,
    ///     timestamp: None,
    ///     captured_length: 2,
    ///     wire_length: 60,
    ///     consumed: 0,
    ///     layers: vec![Layer::new("ether", 0, "ether")],
    ///     outcome: Outcome::Truncated,
    ///     marker: Some("[|ether]".to_string()),
    /// };
    /// assert_eq!(frame.render_text(), "3 - ether [|ether]");
    /// ```
    pub fn render_text(&self) -> String {
        let mut line = format!(
            "{} {}",
            self.frame_number,
            self.timestamp.as_deref().unwrap_or("-")
        );
        let mut separator = " ";
        for layer in &self.layers {
            line.push_str(separator);
            line.push_str(&layer.summary);
            if let Some(marker) = &layer.marker {
                line.push(' ');
                line.push_str(marker);
            }
            separator = ", ";
        }
        if let Some(marker) = &self.marker {
            line.push(' ');
            line.push_str(marker);
        }
        for layer in &self.layers {
            for detail in &layer.details {
                line.push_str("\n    ");
                line.push_str(detail);
            }
        }
        line
    }
}
