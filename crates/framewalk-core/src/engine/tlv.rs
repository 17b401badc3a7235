//! Type-length-value walking.
//!
//! A [`TlvWalker`] iterates the records of one TLV sequence. The sequence is
//! bounded twice: by its declared length (a protocol field) and by the captured
//! bytes. Overrunning the declared length is corruption; overrunning the
//! captured bytes is truncation. Both end the sequence.
//!
//! Record headers are described by a [`TlvLayout`]. Most protocols fit
//! [`FixedTlv`]; irregular headers (single-byte pad options, flag-selected
//! length widths) implement the trait directly.

use byteorder::{BigEndian, LittleEndian};
use thiserror::Error;

use super::cursor::Cursor;
use super::error::{DissectError, Truncated};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U8,
    U16,
    U32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Whether a record's length field counts its own header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMode {
    IncludesHeader,
    BodyOnly,
}

/// Record that ends a sequence early without being corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    None,
    ZeroLength,
    ZeroTypeAndLength,
}

/// Decoded record header, before any validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvHeader {
    pub type_code: u32,
    /// Bits of the raw type field outside the layout's type mask.
    pub flags: u32,
    /// Length as encoded, in `unit`s.
    pub declared_length: usize,
    pub length_mode: LengthMode,
    pub unit: usize,
}

impl TlvHeader {
    /// Header for a record that has no length field at all (pad options).
    pub fn bare(type_code: u32) -> Self {
        Self {
            type_code,
            flags: 0,
            declared_length: 0,
            length_mode: LengthMode::BodyOnly,
            unit: 1,
        }
    }
}

pub trait TlvLayout {
    fn read_header(&self, cursor: &mut Cursor<'_>) -> Result<TlvHeader, Truncated>;

    /// Smallest legal record size, header included.
    fn min_record_len(&self) -> usize {
        0
    }

    fn is_terminator(&self, _header: &TlvHeader) -> bool {
        false
    }
}

/// Fixed-width type and length fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTlv {
    pub type_width: FieldWidth,
    pub length_width: FieldWidth,
    pub endian: Endian,
    pub type_mask: u32,
    pub length_mode: LengthMode,
    pub unit: usize,
    pub min_len: usize,
    pub terminator: Terminator,
}

impl FixedTlv {
    pub const fn new(
        type_width: FieldWidth,
        length_width: FieldWidth,
        length_mode: LengthMode,
    ) -> Self {
        Self {
            type_width,
            length_width,
            endian: Endian::Big,
            type_mask: u32::MAX,
            length_mode,
            unit: 1,
            min_len: 0,
            terminator: Terminator::None,
        }
    }

    pub const fn little_endian(mut self) -> Self {
        self.endian = Endian::Little;
        self
    }

    pub const fn with_type_mask(mut self, mask: u32) -> Self {
        self.type_mask = mask;
        self
    }

    pub const fn with_unit(mut self, unit: usize) -> Self {
        self.unit = unit;
        self
    }

    pub const fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub const fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    fn read_field(&self, cursor: &mut Cursor<'_>, width: FieldWidth) -> Result<u32, Truncated> {
        match (width, self.endian) {
            (FieldWidth::U8, _) => cursor.read_u8().map(u32::from),
            (FieldWidth::U16, Endian::Big) => cursor.read_u16::<BigEndian>().map(u32::from),
            (FieldWidth::U16, Endian::Little) => cursor.read_u16::<LittleEndian>().map(u32::from),
            (FieldWidth::U32, Endian::Big) => cursor.read_u32::<BigEndian>(),
            (FieldWidth::U32, Endian::Little) => cursor.read_u32::<LittleEndian>(),
        }
    }
}

impl TlvLayout for FixedTlv {
    fn read_header(&self, cursor: &mut Cursor<'_>) -> Result<TlvHeader, Truncated> {
        let mut probe = *cursor;
        let raw_type = self.read_field(&mut probe, self.type_width)?;
        let length = self.read_field(&mut probe, self.length_width)?;
        *cursor = probe;
        Ok(TlvHeader {
            type_code: raw_type & self.type_mask,
            flags: raw_type & !self.type_mask,
            declared_length: length as usize,
            length_mode: self.length_mode,
            unit: self.unit,
        })
    }

    fn min_record_len(&self) -> usize {
        self.min_len
    }

    fn is_terminator(&self, header: &TlvHeader) -> bool {
        match self.terminator {
            Terminator::None => false,
            Terminator::ZeroLength => header.declared_length == 0,
            Terminator::ZeroTypeAndLength => header.type_code == 0 && header.declared_length == 0,
        }
    }
}

/// Option lists where some kinds are a single byte with no length field
/// (IPv4/TCP EOL and NOP, IPv6 Pad1) and the rest are `kind, length, value`
/// with 8-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionTlv {
    /// Kind that ends the list.
    pub end: Option<u8>,
    /// Single-byte kinds, `end` included.
    pub single_byte: &'static [u8],
    pub length_mode: LengthMode,
}

impl TlvLayout for OptionTlv {
    fn read_header(&self, cursor: &mut Cursor<'_>) -> Result<TlvHeader, Truncated> {
        let mut probe = *cursor;
        let kind = probe.read_u8()?;
        if self.single_byte.contains(&kind) {
            *cursor = probe;
            return Ok(TlvHeader::bare(u32::from(kind)));
        }
        let length = probe.read_u8()?;
        *cursor = probe;
        Ok(TlvHeader {
            type_code: u32::from(kind),
            flags: 0,
            declared_length: usize::from(length),
            length_mode: self.length_mode,
            unit: 1,
        })
    }

    fn is_terminator(&self, header: &TlvHeader) -> bool {
        self.end.is_some_and(|end| header.type_code == u32::from(end))
    }
}

/// One validated record.
#[derive(Debug, Clone, Copy)]
pub struct TlvRecord<'a> {
    pub type_code: u32,
    pub flags: u32,
    pub declared_length: usize,
    /// Absolute frame offset of the record header.
    pub offset: usize,
    pub body: Cursor<'a>,
    pub terminator: bool,
}

impl<'a> TlvRecord<'a> {
    pub fn body_len(&self) -> usize {
        self.body.remaining()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlvError {
    #[error(transparent)]
    Truncated(#[from] Truncated),
    #[error("record at offset {offset}: {reason}")]
    Corrupt {
        type_code: Option<u32>,
        offset: usize,
        reason: String,
    },
}

impl From<TlvError> for DissectError {
    fn from(value: TlvError) -> Self {
        match value {
            TlvError::Truncated(truncated) => truncated.into(),
            TlvError::Corrupt { offset, reason, .. } => DissectError::corrupt(offset, reason),
        }
    }
}

/// Lazy iterator over one TLV sequence.
///
/// Yields `Ok` records until the declared length is used up, a terminator
/// record is seen, or a record fails validation; a failure is yielded once as
/// `Err` and the iterator is fused afterwards. Each step consumes at least one
/// header byte, so the walk is linear in the sequence length.
pub struct TlvWalker<'a, L> {
    cursor: Cursor<'a>,
    remaining: usize,
    layout: L,
    done: bool,
}

impl<'a, L: TlvLayout> TlvWalker<'a, L> {
    /// Walk `declared_len` bytes starting at `cursor`'s position. The parent
    /// cursor is not advanced; callers move past the sequence themselves.
    pub fn new(cursor: Cursor<'a>, declared_len: usize, layout: L) -> Self {
        let mut cursor = cursor;
        let region = cursor.take_up_to(declared_len);
        Self {
            cursor: region,
            remaining: declared_len,
            layout,
            done: false,
        }
    }

    /// Walk every captured byte of `cursor` as one sequence.
    pub fn over(cursor: Cursor<'a>, layout: L) -> Self {
        let declared_len = cursor.remaining();
        Self::new(cursor, declared_len, layout)
    }

    /// Declared bytes not yet consumed by yielded records.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Drain the walker, keeping the records seen before any failure.
    pub fn into_records(self) -> (Vec<TlvRecord<'a>>, Result<(), TlvError>) {
        let mut records = Vec::new();
        for item in self {
            match item {
                Ok(record) => records.push(record),
                Err(err) => return (records, Err(err)),
            }
        }
        (records, Ok(()))
    }

    fn fail(&mut self, err: TlvError) -> Option<Result<TlvRecord<'a>, TlvError>> {
        self.done = true;
        Some(Err(err))
    }

    fn corrupt(
        &mut self,
        type_code: Option<u32>,
        offset: usize,
        reason: String,
    ) -> Option<Result<TlvRecord<'a>, TlvError>> {
        self.fail(TlvError::Corrupt {
            type_code,
            offset,
            reason,
        })
    }
}

impl<'a, L: TlvLayout> Iterator for TlvWalker<'a, L> {
    type Item = Result<TlvRecord<'a>, TlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.remaining == 0 {
            self.done = true;
            return None;
        }

        let offset = self.cursor.offset();
        let start = self.cursor.position();
        let header = match self.layout.read_header(&mut self.cursor) {
            Ok(header) => header,
            Err(truncated) => {
                // The region is min(declared, captured): if the declared bytes
                // were all captured, the header itself overruns the sequence.
                if self.remaining <= self.cursor.remaining() {
                    let reason = format!(
                        "record header needs {} bytes, {} left in sequence",
                        truncated.needed, self.remaining
                    );
                    return self.corrupt(None, offset, reason);
                }
                return self.fail(truncated.into());
            }
        };
        let header_len = self.cursor.position() - start;
        if header_len == 0 {
            return self.corrupt(
                Some(header.type_code),
                offset,
                "record header consumed no bytes".to_string(),
            );
        }

        if self.layout.is_terminator(&header) {
            self.done = true;
            self.remaining -= header_len;
            return Some(Ok(TlvRecord {
                type_code: header.type_code,
                flags: header.flags,
                declared_length: header.declared_length,
                offset,
                body: self.cursor.take_up_to(0),
                terminator: true,
            }));
        }

        let Some(scaled) = header.declared_length.checked_mul(header.unit) else {
            return self.corrupt(
                Some(header.type_code),
                offset,
                format!("length {} overflows", header.declared_length),
            );
        };
        let (record_len, body_len) = match header.length_mode {
            LengthMode::IncludesHeader => {
                let Some(body_len) = scaled.checked_sub(header_len) else {
                    let reason = format!("length {scaled} below header size {header_len}");
                    return self.corrupt(Some(header.type_code), offset, reason);
                };
                (scaled, body_len)
            }
            LengthMode::BodyOnly => match header_len.checked_add(scaled) {
                Some(record_len) => (record_len, scaled),
                None => {
                    let reason = format!("length {scaled} overflows");
                    return self.corrupt(Some(header.type_code), offset, reason);
                }
            },
        };

        let min_len = self.layout.min_record_len();
        if record_len < min_len {
            let reason = format!("length {record_len} below minimum {min_len}");
            return self.corrupt(Some(header.type_code), offset, reason);
        }
        if record_len > self.remaining {
            let reason = format!(
                "length {record_len} exceeds {} bytes left in sequence",
                self.remaining
            );
            return self.corrupt(Some(header.type_code), offset, reason);
        }

        let body = match self.cursor.take(body_len) {
            Ok(body) => body,
            Err(truncated) => return self.fail(truncated.into()),
        };
        self.remaining -= record_len;

        Some(Ok(TlvRecord {
            type_code: header.type_code,
            flags: header.flags,
            declared_length: header.declared_length,
            offset,
            body,
            terminator: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ONE_ONE_INCLUSIVE: FixedTlv =
        FixedTlv::new(FieldWidth::U8, FieldWidth::U8, LengthMode::IncludesHeader).with_min_len(2);
    const TWO_TWO_BODY: FixedTlv = FixedTlv::new(FieldWidth::U16, FieldWidth::U16, LengthMode::BodyOnly);

    const IP_OPTIONS: OptionTlv = OptionTlv {
        end: Some(0),
        single_byte: &[0, 1],
        length_mode: LengthMode::IncludesHeader,
    };

    #[test]
    fn single_byte_options_and_end_of_list() {
        // NOP, NOP, timestamp-ish (kind 8, len 4), EOL, padding
        let data = [0x01, 0x01, 0x08, 0x04, 0xaa, 0xbb, 0x00, 0x00];
        let (records, status) = TlvWalker::over(Cursor::new(&data), IP_OPTIONS).into_records();
        assert!(status.is_ok());
        let kinds: Vec<u32> = records.iter().map(|r| r.type_code).collect();
        assert_eq!(kinds, vec![1, 1, 8, 0]);
        assert!(records[3].terminator);
        assert_eq!(records[2].body.as_slice(), &[0xaa, 0xbb]);
    }

    #[test]
    fn option_length_below_two_is_corrupt() {
        let data = [0x07, 0x01, 0x00, 0x00];
        let (records, status) = TlvWalker::over(Cursor::new(&data), IP_OPTIONS).into_records();
        assert!(records.is_empty());
        assert!(matches!(status, Err(TlvError::Corrupt { type_code: Some(7), .. })));
    }

    #[test]
    fn zero_body_record_then_clean_end() {
        let data = [0x01, 0x02];
        let walker = TlvWalker::over(Cursor::new(&data), ONE_ONE_INCLUSIVE);
        let (records, status) = walker.into_records();
        assert!(status.is_ok());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].type_code, 1);
        assert_eq!(records[0].body_len(), 0);
    }

    #[test]
    fn second_record_overrunning_sequence_is_corrupt() {
        // Sequence of 6 declared bytes followed by unrelated data.
        let data = [0x01, 0x03, 0xaa, 0x02, 0x09, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
        let walker = TlvWalker::new(Cursor::new(&data), 6, ONE_ONE_INCLUSIVE);
        let (records, status) = walker.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body.as_slice(), &[0xaa]);
        match status {
            Err(TlvError::Corrupt { type_code, offset, .. }) => {
                assert_eq!(type_code, Some(2));
                assert_eq!(offset, 3);
            }
            other => panic!("expected corrupt, got {other:?}"),
        }
    }

    #[test]
    fn uncaptured_body_is_truncated() {
        let data = [0x00, 0x07, 0x00, 0x08, 0x01, 0x02];
        let walker = TlvWalker::new(Cursor::new(&data), 12, TWO_TWO_BODY);
        let (records, status) = walker.into_records();
        assert!(records.is_empty());
        assert!(matches!(status, Err(TlvError::Truncated(_))));
    }

    #[test]
    fn header_overrunning_declared_length_is_corrupt() {
        let data = [0x00, 0x07, 0x00, 0x00, 0x00, 0x01, 0x00];
        let walker = TlvWalker::new(Cursor::new(&data), 6, TWO_TWO_BODY);
        let (records, status) = walker.into_records();
        assert_eq!(records.len(), 1);
        assert!(matches!(status, Err(TlvError::Corrupt { offset: 4, .. })));
    }

    #[test]
    fn length_below_header_is_corrupt() {
        let data = [0x05, 0x01, 0x00];
        let (records, status) = TlvWalker::over(Cursor::new(&data), ONE_ONE_INCLUSIVE).into_records();
        assert!(records.is_empty());
        assert!(matches!(status, Err(TlvError::Corrupt { .. })));
    }

    #[test]
    fn terminator_ends_sequence() {
        let layout = ONE_ONE_INCLUSIVE.with_terminator(Terminator::ZeroTypeAndLength);
        let data = [0x01, 0x03, 0xaa, 0x00, 0x00, 0xde, 0xad];
        let (records, status) = TlvWalker::over(Cursor::new(&data), layout).into_records();
        assert!(status.is_ok());
        assert_eq!(records.len(), 2);
        assert!(records[1].terminator);
    }

    #[test]
    fn type_mask_splits_flags() {
        let layout = TWO_TWO_BODY.with_type_mask(0x3fff);
        let data = [0x84, 0x00, 0x00, 0x01, 0x7f];
        let (records, status) = TlvWalker::over(Cursor::new(&data), layout).into_records();
        assert!(status.is_ok());
        assert_eq!(records[0].type_code, 0x0400);
        assert_eq!(records[0].flags, 0x8000);
    }

    #[test]
    fn little_endian_units() {
        let layout = FixedTlv::new(FieldWidth::U8, FieldWidth::U16, LengthMode::BodyOnly)
            .little_endian()
            .with_unit(4);
        let data = [0x09, 0x01, 0x00, 1, 2, 3, 4];
        let (records, status) = TlvWalker::over(Cursor::new(&data), layout).into_records();
        assert!(status.is_ok());
        assert_eq!(records[0].body_len(), 4);
    }

    #[test]
    fn nested_walk_over_body() {
        let data = [0x00, 0x01, 0x00, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00];
        let (outer, status) = TlvWalker::over(Cursor::new(&data), TWO_TWO_BODY).into_records();
        assert!(status.is_ok());
        let (inner, status) = TlvWalker::over(outer[0].body, TWO_TWO_BODY).into_records();
        assert!(status.is_ok());
        let types: Vec<u32> = inner.iter().map(|r| r.type_code).collect();
        assert_eq!(types, vec![2, 3]);
        assert_eq!(inner[1].offset, 8);
    }

    proptest! {
        #[test]
        fn walk_terminates_linearly(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let walker = TlvWalker::over(Cursor::new(&data), ONE_ONE_INCLUSIVE);
            let steps = walker.count();
            prop_assert!(steps <= data.len() / 2 + 1);
        }

        #[test]
        fn records_stay_inside_sequence(
            data in proptest::collection::vec(any::<u8>(), 0..256),
            declared in 0usize..300,
        ) {
            let walker = TlvWalker::new(Cursor::new(&data), declared, TWO_TWO_BODY);
            let bound = declared.min(data.len());
            for item in walker {
                match item {
                    Ok(record) => {
                        let end = record.body.offset() + record.body.remaining();
                        prop_assert!(end <= bound);
                    }
                    Err(_) => break,
                }
            }
        }
    }
}
