use std::fmt::Write as _;

use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerId, LinkAddress};
use crate::protocols::common::name_of;
use crate::protocols::llc;

use super::layout;

/// Linux "cooked" capture header (`LINKTYPE_LINUX_SLL`).
pub fn dissect_sll(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let packet_type = payload.read_u16_be()?;
    let hatype = payload.read_u16_be()?;
    let halen = payload.read_u16_be()?;
    let address: [u8; layout::ADDRESS_FIELD_LEN] = payload.read_array()?;
    let protocol = payload.read_u16_be()?;

    let len = usize::from(halen).min(layout::ADDRESS_FIELD_LEN);
    let source = if hatype == layout::ARPHRD_ETHER && len == 6 {
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&address[..6]);
        LinkAddress::Ethernet(mac)
    } else {
        LinkAddress::Cooked {
            len: len as u8,
            bytes: address,
        }
    };
    ctx.addressing.link_src = Some(source);

    let mut summary = format!("sll {}", name_of(layout::PACKET_TYPES, packet_type));
    if ctx.options().emit_link_addresses {
        let _ = write!(summary, " {}", ctx.link_name(&source));
    }

    match protocol {
        layout::PROTO_8022 => {
            summary.push_str(", 802.2");
            ctx.push_layer(Layer::new("sll", offset, summary));
            let inner = ctx.call("llc", llc::dissect_llc, payload)?;
            Ok(layout::HEADER_LEN + inner)
        }
        layout::PROTO_8023_RAW => {
            summary.push_str(", 802.3 raw");
            ctx.push_layer(Layer::new("sll", offset, summary));
            Ok(layout::HEADER_LEN + ctx.raw_payload(payload))
        }
        ethertype => {
            let _ = write!(
                summary,
                ", ethertype {} (0x{ethertype:04x})",
                ctx.names().ethertype(ethertype)
            );
            ctx.push_layer(Layer::new("sll", offset, summary));
            let inner = ctx.dispatch(LayerId::Ethertype, u64::from(ethertype), payload)?;
            Ok(layout::HEADER_LEN + inner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DissectOptions;
    use crate::engine::builtin_registry;
    use crate::names::NameCache;

    #[test]
    fn outgoing_ethernet_source_is_recorded() {
        let mut data = vec![0x00, 0x04, 0x00, 0x01, 0x00, 0x06];
        data.extend_from_slice(&[0x02, 0, 0, 0, 0, 9, 0, 0]);
        data.extend_from_slice(&[0x12, 0x34, 0xab]);
        let names = NameCache::default();
        let options = DissectOptions {
            emit_link_addresses: true,
            ..DissectOptions::default()
        };
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let consumed = dissect_sll(Cursor::new(&data), &mut ctx).unwrap();
        assert_eq!(consumed, data.len());
        assert_eq!(
            ctx.addressing.link_src,
            Some(LinkAddress::Ethernet([0x02, 0, 0, 0, 0, 9]))
        );
        assert_eq!(
            ctx.layers()[0].summary,
            "sll Out 02:00:00:00:00:09, ethertype 0x1234 (0x1234)"
        );
    }
}
