use std::fmt::Write as _;

use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerId, LinkAddress};
use crate::protocols::common::declared_region;
use crate::protocols::llc;

use super::layout;

/// Ethernet II or 802.3 MAC header.
pub fn dissect_ethernet(
    mut payload: Cursor<'_>,
    ctx: &mut Dissection<'_>,
) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let frame_len = payload.remaining();
    let dst: [u8; 6] = payload.read_array()?;
    let src: [u8; 6] = payload.read_array()?;
    let type_or_len = payload.read_u16_be()?;

    ctx.addressing.link_src = Some(LinkAddress::Ethernet(src));
    ctx.addressing.link_dst = Some(LinkAddress::Ethernet(dst));

    let mut summary = String::from("ether ");
    if ctx.options().emit_link_addresses {
        let _ = write!(summary, "{} > {}, ", ctx.names().mac(&src), ctx.names().mac(&dst));
    }

    if type_or_len <= layout::MAX_8023_LENGTH {
        let _ = write!(summary, "802.3, length {type_or_len}");
        ctx.push_layer(Layer::new("ether", offset, summary));
        let (region, _) = declared_region(&mut payload, usize::from(type_or_len));
        let region_len = region.remaining();
        ctx.call("llc", llc::dissect_llc, region)?;
        let trailer = payload.rest().len();
        return Ok(layout::HEADER_LEN + region_len + trailer);
    }

    let _ = write!(
        summary,
        "{} (0x{type_or_len:04x}), length {frame_len}",
        ctx.names().ethertype(type_or_len)
    );
    ctx.push_layer(Layer::new("ether", offset, summary));
    let inner = ctx.dispatch(LayerId::Ethertype, u64::from(type_or_len), payload)?;
    Ok(layout::HEADER_LEN + inner)
}

/// 802.1Q / 802.1ad tag: TCI followed by the encapsulated type or length.
pub fn dissect_vlan(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let tci = payload.read_u16_be()?;
    let inner_type = payload.read_u16_be()?;

    let vid = tci & layout::VLAN_ID_MASK;
    let pcp = tci >> layout::VLAN_PCP_SHIFT;
    let mut summary = format!("vlan {vid}, p {pcp}");
    if tci & layout::VLAN_DEI_BIT != 0 {
        summary.push_str(", DEI");
    }

    if inner_type <= layout::MAX_8023_LENGTH {
        let _ = write!(summary, ", length {inner_type}");
        ctx.push_layer(Layer::new("vlan", offset, summary));
        let (region, _) = declared_region(&mut payload, usize::from(inner_type));
        let region_len = region.remaining();
        ctx.call("llc", llc::dissect_llc, region)?;
        return Ok(layout::VLAN_TAG_LEN + region_len + payload.rest().len());
    }

    let _ = write!(
        summary,
        ", ethertype {} (0x{inner_type:04x})",
        ctx.names().ethertype(inner_type)
    );
    ctx.push_layer(Layer::new("vlan", offset, summary));
    let inner = ctx.dispatch(LayerId::Ethertype, u64::from(inner_type), payload)?;
    Ok(layout::VLAN_TAG_LEN + inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DissectOptions;
    use crate::engine::{Outcome, builtin_registry};
    use crate::names::NameCache;

    fn run(data: &[u8], options: DissectOptions) -> (Result<usize, DissectError>, Vec<Layer>) {
        let names = NameCache::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let result = dissect_ethernet(Cursor::new(data), &mut ctx);
        (result, ctx.into_layers())
    }

    #[test]
    fn short_header_pushes_no_layer() {
        let (result, layers) = run(&[0xff, 0xff], DissectOptions::default());
        assert_eq!(result.unwrap_err().outcome(), Outcome::Truncated);
        assert!(layers.is_empty());
    }

    #[test]
    fn link_addresses_shown_on_request() {
        let mut frame = vec![0xff; 6];
        frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 1]);
        frame.extend_from_slice(&[0x12, 0x34, 0xde, 0xad]);
        let options = DissectOptions {
            emit_link_addresses: true,
            ..DissectOptions::default()
        };
        let (result, layers) = run(&frame, options);
        assert_eq!(result.unwrap(), 16);
        assert_eq!(
            layers[0].summary,
            "ether 02:00:00:00:00:01 > Broadcast, 0x1234 (0x1234), length 16"
        );
        assert_eq!(layers[1].protocol, "data");
    }

    #[test]
    fn vlan_tag_dispatches_inner_type() {
        let mut frame = vec![0x02, 0, 0, 0, 0, 2, 0x02, 0, 0, 0, 0, 1, 0x81, 0x00];
        frame.extend_from_slice(&[0x20, 0x64, 0x12, 0x34, 0xaa]);
        let (result, layers) = run(&frame, DissectOptions::default());
        assert_eq!(result.unwrap(), frame.len());
        assert_eq!(layers[1].summary, "vlan 100, p 1, ethertype 0x1234 (0x1234)");
        assert_eq!(layers[2].protocol, "data");
    }

    #[test]
    fn length_field_hands_off_to_llc_and_counts_padding() {
        let mut frame = vec![0x01, 0x80, 0xc2, 0, 0, 0, 0x02, 0, 0, 0, 0, 1];
        frame.extend_from_slice(&[0x00, 0x03, 0xe0, 0xe0, 0x03]);
        frame.extend_from_slice(&[0u8; 10]);
        let (result, layers) = run(&frame, DissectOptions::default());
        assert_eq!(result.unwrap(), frame.len());
        assert_eq!(layers[0].summary, "ether 802.3, length 3");
        assert_eq!(layers[1].protocol, "llc");
    }
}
