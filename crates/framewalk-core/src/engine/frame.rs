use std::borrow::Cow;

use super::cursor::Cursor;

/// One captured packet: the captured bytes plus the length it had on the wire.
///
/// `captured_length <= wire_length` always holds; a capture record claiming a
/// wire length shorter than what was captured is clamped up.
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    data: Cow<'a, [u8]>,
    wire_length: usize,
}

impl<'a> FrameView<'a> {
    pub fn new(data: impl Into<Cow<'a, [u8]>>, wire_length: usize) -> Self {
        let data = data.into();
        let wire_length = wire_length.max(data.len());
        Self { data, wire_length }
    }

    /// Frame whose captured bytes are the whole packet.
    pub fn complete(data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self::new(data, 0)
    }

    pub fn captured_length(&self) -> usize {
        self.data.len()
    }

    pub fn wire_length(&self) -> usize {
        self.wire_length
    }

    pub fn is_short(&self) -> bool {
        self.captured_length() < self.wire_length
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.data)
    }
}
