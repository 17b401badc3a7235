use std::fmt::Write as _;

use crate::engine::{
    Cursor, DissectError, Dissection, Layer, LayerId, LengthMode, OptionTlv, TlvWalker,
};
use crate::protocols::common::{declared_region, hex, name_of, walk_failed};

use super::layout;

const OPTIONS: OptionTlv = OptionTlv {
    end: Some(layout::OPT_EOL),
    single_byte: &[layout::OPT_EOL, layout::OPT_NOP],
    length_mode: LengthMode::IncludesHeader,
};

pub fn dissect_ipv4(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let vhl = payload.read_u8()?;
    let version = vhl >> 4;
    if version != layout::VERSION {
        return Err(DissectError::corrupt(offset, format!("IP version {version}")));
    }
    let header_len = usize::from(vhl & 0x0f) * 4;
    if header_len < layout::MIN_HEADER_LEN {
        return Err(DissectError::corrupt(
            offset,
            format!("header length {header_len} below {}", layout::MIN_HEADER_LEN),
        ));
    }
    let tos = payload.read_u8()?;
    let total_len = usize::from(payload.read_u16_be()?);
    let id = payload.read_u16_be()?;
    let frag = payload.read_u16_be()?;
    let ttl = payload.read_u8()?;
    let proto = payload.read_u8()?;
    let checksum = payload.read_u16_be()?;
    let src: [u8; 4] = payload.read_array()?;
    let dst: [u8; 4] = payload.read_array()?;
    if total_len < header_len {
        return Err(DissectError::corrupt(
            offset,
            format!("total length {total_len} below header length {header_len}"),
        ));
    }

    let names = ctx.names();
    let fragment_offset = usize::from(frag & layout::FRAGMENT_OFFSET_MASK) * 8;
    let mut summary = format!(
        "IP {} > {}: {} ({proto}), ttl {ttl}, id {id}",
        names.ipv4(&src),
        names.ipv4(&dst),
        names.ip_proto(proto)
    );
    let flags: Vec<&str> = [
        (layout::FLAG_RESERVED, "+"),
        (layout::FLAG_DF, "DF"),
        (layout::FLAG_MF, "MF"),
    ]
    .iter()
    .filter(|(bit, _)| frag & bit != 0)
    .map(|(_, name)| *name)
    .collect();
    if !flags.is_empty() {
        let _ = write!(summary, ", flags [{}]", flags.join(","));
    }
    if fragment_offset != 0 {
        let _ = write!(summary, ", offset {fragment_offset}");
    }
    let _ = write!(summary, ", length {total_len}");
    let layer = ctx.push_layer(Layer::new("ip", offset, summary));
    ctx.detail(layer, format!("tos 0x{tos:02x}, cksum 0x{checksum:04x}"));

    let options = payload.take(header_len - layout::MIN_HEADER_LEN)?;
    for item in TlvWalker::over(options, OPTIONS) {
        match item {
            Ok(option) => {
                let name = name_of(layout::OPTION_NAMES, option.type_code as u8);
                let line = if option.body_len() == 0 {
                    format!("option {name} ({})", option.type_code)
                } else {
                    format!(
                        "option {name} ({}), length {}: {}",
                        option.type_code,
                        option.declared_length,
                        hex(option.body.as_slice())
                    )
                };
                ctx.detail(layer, line);
            }
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        }
    }

    let (inner, _) = declared_region(&mut payload, total_len - header_len);
    let consumed = if fragment_offset != 0 {
        ctx.raw_payload(inner)
    } else {
        ctx.dispatch(LayerId::IpProto, u64::from(proto), inner)?
    };
    Ok(header_len + consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DissectOptions, Verbosity};
    use crate::engine::{Outcome, builtin_registry};
    use crate::names::NameCache;

    fn header(ihl: u8, total_len: u16, frag: u16, proto: u8) -> Vec<u8> {
        let mut data = vec![0x40 | ihl, 0x00];
        data.extend_from_slice(&total_len.to_be_bytes());
        data.extend_from_slice(&[0x12, 0x34]);
        data.extend_from_slice(&frag.to_be_bytes());
        data.extend_from_slice(&[64, proto, 0, 0]);
        data.extend_from_slice(&[192, 0, 2, 1, 192, 0, 2, 2]);
        data
    }

    fn run(data: &[u8], options: DissectOptions) -> (Result<usize, DissectError>, Vec<Layer>) {
        let names = NameCache::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let result = dissect_ipv4(Cursor::new(data), &mut ctx);
        (result, ctx.into_layers())
    }

    #[test]
    fn renders_header_and_dispatches_payload() {
        let mut data = header(5, 24, 0x4000, 253);
        data.extend_from_slice(&[1, 2, 3, 4]);
        let (result, layers) = run(&data, DissectOptions::default());
        assert_eq!(result.unwrap(), 24);
        assert_eq!(
            layers[0].summary,
            "IP 192.0.2.1 > 192.0.2.2: ip-proto-253 (253), ttl 64, id 4660, flags [DF], length 24"
        );
        assert_eq!(layers[1].protocol, "data");
    }

    #[test]
    fn header_length_below_minimum_is_corrupt() {
        let data = header(4, 20, 0, 6);
        let (result, layers) = run(&data, DissectOptions::default());
        assert_eq!(result.unwrap_err().outcome(), Outcome::Corrupt);
        assert!(layers.is_empty());
    }

    #[test]
    fn options_are_walked_and_bad_option_is_local() {
        let mut data = header(7, 28, 0, 253);
        // NOP, router alert (len 4), then a record claiming length 9
        data.extend_from_slice(&[0x01, 0x94, 0x04, 0x00, 0x00, 0x44, 0x09, 0x00]);
        let options = DissectOptions {
            verbosity: Verbosity::Verbose,
            ..DissectOptions::default()
        };
        let (result, layers) = run(&data, options);
        assert_eq!(result.unwrap(), 28);
        assert!(layers[0].details.iter().any(|line| line.starts_with("option RA (148)")));
        assert!(layers[0].marker.as_deref().unwrap().starts_with("[ip: invalid, length 9 exceeds"));
    }

    #[test]
    fn later_fragment_is_not_dispatched() {
        let mut data = header(5, 28, 0x0001, 6);
        data.extend_from_slice(&[0u8; 8]);
        let (result, layers) = run(&data, DissectOptions::default());
        assert_eq!(result.unwrap(), 28);
        assert!(layers[0].summary.contains("offset 8"));
        assert_eq!(layers[1].protocol, "data");
    }
}
