use std::fmt::Write as _;

use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerId, TypeCode};
use crate::protocols::common::name_of;

use super::layout;

/// 802.2 LLC header, with SNAP when both SAPs are 0xaa on a UI frame.
pub fn dissect_llc(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let dsap_field = payload.read_u8()?;
    let ssap_field = payload.read_u8()?;
    let first = payload.peek_u8()?;

    let dsap = dsap_field & !layout::IG_BIT;
    let ssap = ssap_field & !layout::CR_BIT;
    let direction = if ssap_field & layout::CR_BIT != 0 {
        "Response"
    } else {
        "Command"
    };

    if first & layout::U_FORMAT_MASK != layout::U_FORMAT {
        let control = payload.read_u16_le()?;
        let summary = format!(
            "llc {} (0x{dsap:02x}) > {} (0x{ssap:02x}) {direction}, {}",
            ctx.names().llc_sap(dsap),
            ctx.names().llc_sap(ssap),
            sequenced_control(control)
        );
        ctx.push_layer(Layer::new("llc", offset, summary));
        return Ok(layout::IS_HEADER_LEN + ctx.raw_payload(payload));
    }

    let control = payload.read_u8()?;
    if dsap == layout::SAP_SNAP && ssap == layout::SAP_SNAP && control == layout::U_UI {
        return dissect_snap(offset, payload, ctx).map(|inner| layout::U_HEADER_LEN + inner);
    }

    let command = name_of(layout::U_COMMANDS, control & !layout::POLL_FINAL_BIT);
    let mut summary = String::from("llc ");
    let dispatchable = control & !layout::POLL_FINAL_BIT == layout::U_UI;
    if dispatchable && !ctx.can_dispatch(LayerId::LlcSap, u64::from(dsap)) {
        // Nothing further up will print the hosts involved.
        if let (Some(src), Some(dst)) = (ctx.addressing.link_src, ctx.addressing.link_dst) {
            if !ctx.options().emit_link_addresses {
                let _ = write!(summary, "{} > {}, ", ctx.link_name(&src), ctx.link_name(&dst));
            }
        }
    }
    let _ = write!(
        summary,
        "{} (0x{dsap:02x}) > {} (0x{ssap:02x}) {direction}, ctrl 0x{control:02x} {command}",
        ctx.names().llc_sap(dsap),
        ctx.names().llc_sap(ssap),
    );
    ctx.push_layer(Layer::new("llc", offset, summary));

    let inner = if dispatchable {
        ctx.dispatch(LayerId::LlcSap, u64::from(dsap), payload)?
    } else {
        ctx.raw_payload(payload)
    };
    Ok(layout::U_HEADER_LEN + inner)
}

fn dissect_snap(
    offset: usize,
    mut payload: Cursor<'_>,
    ctx: &mut Dissection<'_>,
) -> Result<usize, DissectError> {
    let oui = payload.read_u24_be()?;
    let pid = payload.read_u16_be()?;

    let oui_name = ctx.names().oui(oui);
    let (layer, code, summary) = if oui == layout::OUI_ENCAP_ETHER || oui == layout::OUI_CISCO_90 {
        let summary = format!(
            "llc SNAP, oui {oui_name} (0x{oui:06x}), ethertype {} (0x{pid:04x})",
            ctx.names().ethertype(pid)
        );
        (LayerId::Ethertype, TypeCode::from(pid), summary)
    } else {
        let summary = format!("llc SNAP, oui {oui_name} (0x{oui:06x}), pid 0x{pid:04x}");
        (LayerId::SnapPid, snap_code(oui, pid), summary)
    };
    ctx.push_layer(Layer::new("llc", offset, summary));
    let inner = ctx.dispatch(layer, code, payload)?;
    Ok(layout::SNAP_HEADER_LEN + inner)
}

/// Key in the SNAP PID space: the 24-bit OUI above the 16-bit PID.
pub fn snap_code(oui: u32, pid: u16) -> TypeCode {
    (TypeCode::from(oui & 0x00ff_ffff) << 16) | TypeCode::from(pid)
}

fn sequenced_control(control: u16) -> String {
    let low = (control & 0xff) as u8;
    let nr = control >> 9;
    if low & layout::S_FORMAT_MASK == 0 {
        let ns = (control >> 1) & 0x7f;
        format!("I, N(S) {ns}, N(R) {nr}")
    } else {
        let kind = name_of(layout::S_COMMANDS, (low >> 2) & 0x03);
        format!("S {kind}, N(R) {nr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DissectOptions;
    use crate::engine::{LinkAddress, Registry, builtin_registry};
    use crate::names::NameCache;

    fn record_code(payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
        let len = payload.remaining();
        ctx.push_layer(Layer::new("probe", payload.offset(), format!("{len} bytes")));
        Ok(len)
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(LayerId::Ethertype, 0x0800, "ip", record_code).unwrap();
        registry
            .register(LayerId::SnapPid, snap_code(0x00000c, 0x2000), "cdp", record_code)
            .unwrap();
        registry
    }

    fn run(data: &[u8], registry: &Registry) -> Vec<Layer> {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(registry, &names, &options);
        ctx.addressing.link_src = Some(LinkAddress::Ethernet([0x02, 0, 0, 0, 0, 1]));
        ctx.addressing.link_dst = Some(LinkAddress::Ethernet([0xff; 6]));
        let consumed = dissect_llc(Cursor::new(data), &mut ctx).unwrap();
        assert_eq!(consumed, data.len());
        ctx.into_layers()
    }

    #[test]
    fn snap_with_zero_oui_uses_ethertype_space() {
        let data = [0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x08, 0x00, 0x45, 0x00];
        let layers = run(&data, &registry());
        assert_eq!(
            layers[0].summary,
            "llc SNAP, oui Ethernet (0x000000), ethertype IPv4 (0x0800)"
        );
        assert_eq!(layers[1].protocol, "probe");
        assert_eq!(layers[1].offset, 8);
    }

    #[test]
    fn snap_with_vendor_oui_uses_pid_space() {
        let data = [0xaa, 0xaa, 0x03, 0x00, 0x00, 0x0c, 0x20, 0x00, 0x01];
        let layers = run(&data, &registry());
        assert_eq!(layers[1].protocol, "probe");
    }

    #[test]
    fn vendor_oui_sharing_low_bytes_with_ieee_is_not_stp() {
        let mut data = vec![0xaa, 0xaa, 0x03, 0xab, 0x80, 0xc2, 0x00, 0x0e];
        data.extend_from_slice(&[0x00; 35]);
        let layers = run(&data, builtin_registry());
        assert_eq!(layers[0].summary, "llc SNAP, oui Unknown (0xab80c2), pid 0x000e");
        assert_eq!(layers[1].protocol, "data");
        assert_ne!(snap_code(0xab80c2, 0x000e), snap_code(0x0080c2, 0x000e));
    }

    #[test]
    fn unknown_sap_names_link_addresses() {
        let data = [0xe0, 0xe0, 0x03, 0xff, 0xff];
        let layers = run(&data, &registry());
        assert_eq!(
            layers[0].summary,
            "llc 02:00:00:00:00:01 > Broadcast, IPX (0xe0) > IPX (0xe0) Command, ctrl 0x03 UI"
        );
        assert_eq!(layers[1].summary, "unknown llc-sap 0xe0, 2 bytes");
    }

    #[test]
    fn information_frame_has_two_byte_control() {
        let data = [0xf0, 0xf1, 0x04, 0x06, 0xde, 0xad];
        let layers = run(&data, &registry());
        assert_eq!(
            layers[0].summary,
            "llc NetBeui (0xf0) > NetBeui (0xf0) Response, I, N(S) 2, N(R) 3"
        );
        assert_eq!(layers[1].protocol, "data");
    }
}
