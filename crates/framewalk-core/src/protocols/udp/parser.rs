use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerId};
use crate::protocols::common::{declared_region, dispatch_ports};

use super::layout;

pub fn dissect_udp(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let src_port = payload.read_u16_be()?;
    let dst_port = payload.read_u16_be()?;
    let length = usize::from(payload.read_u16_be()?);
    let checksum = payload.read_u16_be()?;
    if length < layout::HEADER_LEN {
        return Err(DissectError::corrupt(
            offset,
            format!("length {length} below header length {}", layout::HEADER_LEN),
        ));
    }

    let summary = format!(
        "UDP {} > {}: length {}",
        ctx.names().udp_port(src_port),
        ctx.names().udp_port(dst_port),
        length - layout::HEADER_LEN
    );
    let layer = ctx.push_layer(Layer::new("udp", offset, summary));
    ctx.detail(layer, format!("cksum 0x{checksum:04x}"));

    let (datagram, _) = declared_region(&mut payload, length - layout::HEADER_LEN);
    let inner = dispatch_ports(ctx, LayerId::UdpPort, src_port, dst_port, datagram)?;
    Ok(layout::HEADER_LEN + inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DissectOptions;
    use crate::engine::{Outcome, builtin_registry};
    use crate::names::NameCache;

    fn datagram(length: u16, data: &[u8]) -> Vec<u8> {
        let mut out = vec![0x04, 0x00, 0x00, 0x35];
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(data);
        out
    }

    fn summary_with(names: &NameCache, resolve_names: bool) -> String {
        let options = DissectOptions {
            resolve_names,
            ..DissectOptions::default()
        };
        let mut ctx = Dissection::new(builtin_registry(), names, &options);
        let data = datagram(12, &[1, 2, 3, 4, 0xee]);
        let consumed = dissect_udp(Cursor::new(&data), &mut ctx).unwrap();
        assert_eq!(consumed, 12);
        assert_eq!(ctx.layers()[1].summary, "4 bytes");
        ctx.layers()[0].summary.clone()
    }

    #[test]
    fn resolve_option_alone_toggles_service_names() {
        let names = NameCache::default();
        assert_eq!(summary_with(&names, true), "UDP 1024 > domain: length 4");
        assert_eq!(summary_with(&names, false), "UDP 1024 > 53: length 4");
        assert_eq!(summary_with(&names, true), "UDP 1024 > domain: length 4");
    }

    #[test]
    fn length_below_header_is_corrupt() {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let err = dissect_udp(Cursor::new(&datagram(7, &[])), &mut ctx).unwrap_err();
        assert_eq!(err.outcome(), Outcome::Corrupt);
    }
}
