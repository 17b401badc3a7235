use std::fmt::Write as _;
use std::sync::Arc;

use crate::engine::{Cursor, DissectError, Dissection, Layer, LinkAddress};
use crate::names::AddressFamily;

use super::layout;

/// ARP and RARP packets.
pub fn dissect_arp(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let hrd = payload.read_u16_be()?;
    let pro = payload.read_u16_be()?;
    let hln = usize::from(payload.read_u8()?);
    let pln = usize::from(payload.read_u8()?);
    let op = payload.read_u16_be()?;
    let sha = payload.read_bytes(hln)?;
    let spa = payload.read_bytes(pln)?;
    let tha = payload.read_bytes(hln)?;
    let tpa = payload.read_bytes(pln)?;

    let view: &Dissection<'_> = ctx;
    let hw = |bytes: &[u8]| hardware_name(view, hrd, bytes);
    let proto = |bytes: &[u8]| protocol_name(view, pro, bytes);
    let label = if op == layout::OP_REVREQUEST || op == layout::OP_REVREPLY {
        "RARP"
    } else {
        "ARP"
    };

    let mut summary = match op {
        layout::OP_REQUEST => format!("{label}, Request who-has {} tell {}", proto(tpa), proto(spa)),
        layout::OP_REPLY => format!("{label}, Reply {} is-at {}", proto(spa), hw(sha)),
        layout::OP_REVREQUEST => format!("{label}, Request who-is {} tell {}", hw(tha), hw(sha)),
        layout::OP_REVREPLY => format!("{label}, Reply {} at {}", hw(tha), proto(tpa)),
        layout::OP_INVREQUEST => format!("InARP, Request who-is {} tell {}", hw(tha), hw(sha)),
        layout::OP_INVREPLY => format!("InARP, Reply {} at {}", hw(tha), proto(tpa)),
        other => format!("{label}, unknown opcode {other}"),
    };

    // A sender address that differs from the frame's source is worth showing.
    if let Some(LinkAddress::Ethernet(src)) = ctx.addressing.link_src {
        if hrd == layout::HRD_ETHER && sha.len() == 6 && sha != src.as_slice() {
            let _ = write!(summary, " (frame source {})", ctx.names().mac(&src));
        }
    }
    let _ = write!(summary, ", length {}", layout::FIXED_LEN + 2 * (hln + pln));

    let layer = ctx.push_layer(Layer::new("arp", offset, summary));
    ctx.detail(layer, format!("hardware type {hrd}, protocol type 0x{pro:04x}"));
    Ok(layout::FIXED_LEN + 2 * (hln + pln))
}

fn hardware_name(ctx: &Dissection<'_>, hrd: u16, bytes: &[u8]) -> Arc<str> {
    let family = match (hrd, bytes.len()) {
        (layout::HRD_ETHER | layout::HRD_IEEE802, 6) => AddressFamily::Ethernet,
        _ => AddressFamily::Bytes,
    };
    ctx.name(family, bytes)
}

fn protocol_name(ctx: &Dissection<'_>, pro: u16, bytes: &[u8]) -> Arc<str> {
    let family = match (pro, bytes.len()) {
        (layout::PRO_IPV4, 4) => AddressFamily::Ipv4,
        _ => AddressFamily::Bytes,
    };
    ctx.name(family, bytes)
}
