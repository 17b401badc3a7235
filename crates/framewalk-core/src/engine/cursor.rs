use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::error::Truncated;

/// Read-only cursor over the captured bytes of one frame (or a sub-region).
///
/// The cursor owns no data: it borrows exactly the captured region, so a read
/// can never observe bytes past the captured end. Every read either returns a
/// value and advances, or returns [`Truncated`] and leaves the position as it
/// was.
///
/// `base` is the absolute frame offset of the first byte of `buf`; it only
/// feeds diagnostics (`offset()`), never indexing.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            base: 0,
        }
    }

    /// Absolute offset of the next unread byte within the frame.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Position relative to the start of this cursor's region.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without advancing.
    pub fn as_slice(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn require(&self, needed: usize) -> Result<(), Truncated> {
        if needed > self.remaining() {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    pub fn peek_u8(&self) -> Result<u8, Truncated> {
        self.peek_bytes(1).map(|bytes| bytes[0])
    }

    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8], Truncated> {
        self.require(len)?;
        Ok(&self.buf[self.pos..self.pos + len])
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Truncated> {
        let bytes = self.peek_bytes(len)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Truncated> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Truncated> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, Truncated> {
        self.read_bytes(1).map(|bytes| bytes[0])
    }

    pub fn read_u16<E: ByteOrder>(&mut self) -> Result<u16, Truncated> {
        self.read_bytes(2).map(E::read_u16)
    }

    pub fn read_u24<E: ByteOrder>(&mut self) -> Result<u32, Truncated> {
        self.read_bytes(3).map(E::read_u24)
    }

    pub fn read_u32<E: ByteOrder>(&mut self) -> Result<u32, Truncated> {
        self.read_bytes(4).map(E::read_u32)
    }

    pub fn read_u64<E: ByteOrder>(&mut self) -> Result<u64, Truncated> {
        self.read_bytes(8).map(E::read_u64)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, Truncated> {
        self.read_u16::<BigEndian>()
    }

    pub fn read_u16_le(&mut self) -> Result<u16, Truncated> {
        self.read_u16::<LittleEndian>()
    }

    pub fn read_u24_be(&mut self) -> Result<u32, Truncated> {
        self.read_u24::<BigEndian>()
    }

    pub fn read_u32_be(&mut self) -> Result<u32, Truncated> {
        self.read_u32::<BigEndian>()
    }

    pub fn read_u32_le(&mut self) -> Result<u32, Truncated> {
        self.read_u32::<LittleEndian>()
    }

    pub fn read_u64_be(&mut self) -> Result<u64, Truncated> {
        self.read_u64::<BigEndian>()
    }

    /// Split off the next `len` bytes as a bounded sub-cursor and advance past
    /// them. Fails without advancing when fewer than `len` bytes were captured.
    pub fn take(&mut self, len: usize) -> Result<Cursor<'a>, Truncated> {
        let base = self.offset();
        let buf = self.read_bytes(len)?;
        Ok(Cursor { buf, pos: 0, base })
    }

    /// Sub-cursor over at most `declared` bytes: a protocol length field may
    /// claim more than was captured, in which case the sub-cursor ends at the
    /// captured end and reads beyond it report `Truncated`.
    pub fn take_up_to(&mut self, declared: usize) -> Cursor<'a> {
        let len = declared.min(self.remaining());
        let base = self.offset();
        let buf = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Cursor { buf, pos: 0, base }
    }

    /// Consume everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let bytes = self.as_slice();
        self.pos = self.buf.len();
        bytes
    }

    fn truncated(&self, needed: usize) -> Truncated {
        Truncated {
            offset: self.offset(),
            needed,
            available: self.remaining(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use byteorder::{BigEndian, LittleEndian};
    use proptest::prelude::*;

    #[test]
    fn reads_big_and_little_endian() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u16_be().unwrap(), 0x1234);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x7856);
        assert_eq!(cursor.read_u16::<BigEndian>().unwrap(), 0x9abc);
        assert!(cursor.is_empty());

        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u24_be().unwrap(), 0x123456);
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 0x7856_3412);
    }

    #[test]
    fn truncated_read_does_not_advance() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = Cursor::new(&data);
        cursor.read_u8().unwrap();
        let err = cursor.read_u32_be().unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.needed, 4);
        assert_eq!(err.available, 2);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16_be().unwrap(), 0x0203);
    }

    #[test]
    fn take_keeps_absolute_offsets() {
        let data = [0u8; 10];
        let mut cursor = Cursor::new(&data);
        cursor.skip(4).unwrap();
        let mut inner = cursor.take(3).unwrap();
        assert_eq!(inner.offset(), 4);
        assert_eq!(inner.remaining(), 3);
        inner.skip(2).unwrap();
        assert_eq!(inner.offset(), 6);
        assert_eq!(cursor.offset(), 7);
        let err = inner.read_u16_be().unwrap_err();
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn take_up_to_clamps_to_captured() {
        let data = [1u8, 2, 3];
        let mut cursor = Cursor::new(&data);
        let inner = cursor.take_up_to(1500);
        assert_eq!(inner.remaining(), 3);
        assert!(cursor.is_empty());
    }

    #[test]
    fn take_past_end_is_truncated() {
        let data = [1u8, 2, 3];
        let mut cursor = Cursor::new(&data);
        assert!(cursor.take(4).is_err());
        assert_eq!(cursor.remaining(), 3);
    }

    #[test]
    fn huge_lengths_do_not_wrap() {
        let data = [0u8; 4];
        let mut cursor = Cursor::new(&data);
        cursor.skip(2).unwrap();
        assert!(cursor.read_bytes(usize::MAX).is_err());
        assert!(cursor.take(usize::MAX - 1).is_err());
        assert_eq!(cursor.take_up_to(usize::MAX).remaining(), 2);
    }

    proptest! {
        #[test]
        fn reads_never_cross_captured_end(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            widths in proptest::collection::vec(0usize..12, 0..32),
        ) {
            let mut cursor = Cursor::new(&data);
            for width in widths {
                let before = cursor.position();
                match cursor.read_bytes(width) {
                    Ok(bytes) => {
                        prop_assert_eq!(bytes.len(), width);
                        prop_assert_eq!(bytes, &data[before..before + width]);
                    }
                    Err(err) => {
                        prop_assert!(width > data.len() - before);
                        prop_assert_eq!(err.available, data.len() - before);
                        prop_assert_eq!(cursor.position(), before);
                    }
                }
                prop_assert!(cursor.position() <= data.len());
            }
        }
    }
}
