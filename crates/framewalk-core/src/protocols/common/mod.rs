//! Helpers shared by protocol handlers.

use crate::engine::{
    Cursor, DissectError, Dissection, LayerId, LayerRef, TlvError, TlvRecord,
};

/// Name for `code` in a static table, or `"unknown"`.
pub(crate) fn name_of<K: PartialEq + Copy>(table: &[(K, &'static str)], code: K) -> &'static str {
    table
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map_or("unknown", |(_, name)| *name)
}

/// Names of the bits set in `value`, in table order.
pub(crate) fn bit_names<T>(table: &[(T, &'static str)], value: T) -> Vec<&'static str>
where
    T: Copy + Into<u32>,
{
    let value = value.into();
    table
        .iter()
        .filter(|(bit, _)| value & (*bit).into() != 0)
        .map(|(_, name)| *name)
        .collect()
}

/// Decode a record body whose bytes were fully captured. Running out of body
/// bytes means the record's length disagrees with its type, which is
/// corruption, not truncation.
pub(crate) fn in_record<T, E>(
    record: &TlvRecord<'_>,
    what: &str,
    result: Result<T, E>,
) -> Result<T, DissectError>
where
    E: Into<DissectError>,
{
    result.map_err(|err| match err.into() {
        DissectError::Truncated { .. } => DissectError::corrupt(
            record.offset,
            format!("{what} length {} too short", record.declared_length),
        ),
        corrupt => corrupt,
    })
}

/// Handle a failed record walk: running out of captured bytes ends the
/// frame, a corrupt record only ends its sequence and marks `layer`.
pub(crate) fn walk_failed(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    err: TlvError,
) -> Result<(), DissectError> {
    match err {
        TlvError::Truncated(truncated) => Err(truncated.into()),
        corrupt => {
            ctx.mark_corrupt(layer, &corrupt.into());
            Ok(())
        }
    }
}

/// Split off a region announced by a length field. The flag tells whether
/// every declared byte was captured.
pub(crate) fn declared_region<'a>(cursor: &mut Cursor<'a>, declared: usize) -> (Cursor<'a>, bool) {
    let region = cursor.take_up_to(declared);
    let complete = region.remaining() == declared;
    (region, complete)
}

/// Hand a transport payload to whichever port has a registered dissector,
/// destination first.
pub(crate) fn dispatch_ports(
    ctx: &mut Dissection<'_>,
    layer: LayerId,
    src_port: u16,
    dst_port: u16,
    payload: Cursor<'_>,
) -> Result<usize, DissectError> {
    if payload.is_empty() {
        return Ok(0);
    }
    for port in [dst_port, src_port] {
        if ctx.can_dispatch(layer, u64::from(port)) {
            return ctx.dispatch(layer, u64::from(port), payload);
        }
    }
    Ok(ctx.raw_payload(payload))
}

/// Address prefix as carried in routing protocols: a bit length followed by
/// just enough bytes to hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Prefix {
    pub bits: u8,
    pub bytes: [u8; 16],
}

impl Prefix {
    pub fn read(cursor: &mut Cursor<'_>, max_bits: u8) -> Result<Self, DissectError> {
        let offset = cursor.offset();
        let bits = cursor.read_u8()?;
        if bits > max_bits {
            return Err(DissectError::corrupt(
                offset,
                format!("prefix length {bits} exceeds {max_bits}"),
            ));
        }
        let len = usize::from(bits).div_ceil(8);
        let mut bytes = [0u8; 16];
        bytes[..len].copy_from_slice(cursor.read_bytes(len)?);
        Ok(Self { bits, bytes })
    }

    pub fn ipv4(&self) -> String {
        let [a, b, c, d, ..] = self.bytes;
        format!("{a}.{b}.{c}.{d}/{}", self.bits)
    }

    pub fn ipv6(&self) -> String {
        format!("{}/{}", std::net::Ipv6Addr::from(self.bytes), self.bits)
    }
}

/// Read prefixes until `region` is used up.
pub(crate) fn read_prefixes(
    region: &mut Cursor<'_>,
    max_bits: u8,
) -> Result<Vec<Prefix>, DissectError> {
    let mut prefixes = Vec::new();
    while !region.is_empty() {
        prefixes.push(Prefix::read(region, max_bits)?);
    }
    Ok(prefixes)
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FixedTlv, FieldWidth, LengthMode, TlvWalker};

    #[test]
    fn name_of_falls_back_to_unknown() {
        let table = [(1u8, "one"), (2, "two")];
        assert_eq!(name_of(&table, 2), "two");
        assert_eq!(name_of(&table, 3), "unknown");
    }

    #[test]
    fn bit_names_in_table_order() {
        let table = [(0x01u8, "A"), (0x02, "B"), (0x80, "H")];
        assert_eq!(bit_names(&table, 0x83), vec!["A", "B", "H"]);
        assert!(bit_names(&table, 0x40).is_empty());
    }

    #[test]
    fn prefixes_use_minimal_bytes() {
        let data = [24, 10, 1, 2, 0, 32, 192, 0, 2, 1];
        let mut cursor = Cursor::new(&data);
        let prefixes = read_prefixes(&mut cursor, 32).unwrap();
        assert_eq!(prefixes.len(), 3);
        assert_eq!(prefixes[0].ipv4(), "10.1.2.0/24");
        assert_eq!(prefixes[1].ipv4(), "0.0.0.0/0");
        assert_eq!(prefixes[2].ipv4(), "192.0.2.1/32");
    }

    #[test]
    fn oversized_prefix_is_corrupt() {
        let data = [33, 10, 0, 0, 0, 0];
        let err = Prefix::read(&mut Cursor::new(&data), 32).unwrap_err();
        assert!(matches!(err, DissectError::Corrupt { .. }));
    }

    #[test]
    fn short_record_body_is_corrupt() {
        let data = [0x04, 0x03, 0x0a];
        let layout = FixedTlv::new(FieldWidth::U8, FieldWidth::U8, LengthMode::IncludesHeader);
        let record = TlvWalker::over(Cursor::new(&data), layout)
            .next()
            .unwrap()
            .unwrap();
        let mut body = record.body;
        let err = in_record(&record, "NAS-IP-Address", body.read_array::<4>()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "frame corrupt at offset 0: NAS-IP-Address length 3 too short"
        );
    }

    #[test]
    fn declared_region_reports_completeness() {
        let data = [0u8; 4];
        let mut cursor = Cursor::new(&data);
        let (region, complete) = declared_region(&mut cursor, 10);
        assert_eq!(region.remaining(), 4);
        assert!(!complete);
    }
}
