use std::fmt::Write as _;

use crate::engine::{
    Cursor, DissectError, Dissection, Layer, LayerRef, LengthMode, TlvHeader, TlvLayout,
    TlvWalker, Truncated,
};
use crate::names::Names;
use crate::protocols::common::{bit_names, name_of, walk_failed};

use super::layout;

/// MSTI configuration messages have no type or length field: each is a
/// fixed 16-byte record whose first byte is its flags.
#[derive(Debug, Clone, Copy)]
struct MstiLayout;

impl TlvLayout for MstiLayout {
    fn read_header(&self, cursor: &mut Cursor<'_>) -> Result<TlvHeader, Truncated> {
        let flags = cursor.read_u8()?;
        Ok(TlvHeader {
            type_code: u32::from(flags),
            flags: 0,
            declared_length: layout::MSTI_LEN,
            length_mode: LengthMode::IncludesHeader,
            unit: 1,
        })
    }
}

pub fn dissect_stp(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let proto_id = payload.read_u16_be()?;
    if proto_id != layout::PROTO_ID {
        return Err(DissectError::corrupt(
            offset,
            format!("protocol id 0x{proto_id:04x}"),
        ));
    }
    let version = payload.read_u8()?;
    let bpdu_type = payload.read_u8()?;
    let version_name = name_of(layout::VERSION_NAMES, version);

    if bpdu_type == layout::BPDU_TCN {
        let summary = format!("STP {version_name}, Topology Change, length {}", layout::TCN_LEN);
        ctx.push_layer(Layer::new("stp", offset, summary));
        return Ok(layout::TCN_LEN);
    }
    let type_name = match (bpdu_type, version) {
        (layout::BPDU_CONFIG, _) => "Config",
        (layout::BPDU_RSTP, layout::VERSION_MSTP) => "Multiple STP",
        (layout::BPDU_RSTP, _) => "Rapid STP",
        (other, _) => {
            let summary = format!("STP {version_name}, unknown BPDU type 0x{other:02x}");
            ctx.push_layer(Layer::new("stp", offset, summary));
            return Ok(layout::TCN_LEN);
        }
    };

    let flags = payload.read_u8()?;
    let root_id: [u8; 8] = payload.read_array()?;
    let root_cost = payload.read_u32_be()?;
    let bridge_id: [u8; 8] = payload.read_array()?;
    let port_id = payload.read_u16_be()?;
    let message_age = payload.read_u16_be()?;
    let max_age = payload.read_u16_be()?;
    let hello = payload.read_u16_be()?;
    let forward_delay = payload.read_u16_be()?;

    let mut length = layout::CONFIG_LEN;
    let mut v3_length = None;
    if bpdu_type == layout::BPDU_RSTP {
        payload.skip(1)?;
        length = layout::RSTP_LEN;
        if version >= layout::VERSION_MSTP {
            let v3 = usize::from(payload.read_u16_be()?);
            length += 2 + v3;
            v3_length = Some(v3);
        }
    }

    let names = ctx.names();
    let summary = format!(
        "STP {version_name}, {type_name}, Flags [{}], bridge-id {}.{port_id:04x}, length {length}",
        render_flags(flags, bpdu_type),
        bridge(names, &bridge_id)
    );
    let details = [
        format!("root-id {}, root-pathcost {root_cost}", bridge(names, &root_id)),
        format!(
            "message-age {}s, max-age {}s, hello-time {}s, forwarding-delay {}s",
            message_age / 256,
            max_age / 256,
            hello / 256,
            forward_delay / 256
        ),
    ];
    let layer = ctx.push_layer(Layer::new("stp", offset, summary));
    for line in details {
        ctx.detail(layer, line);
    }

    if let Some(v3_length) = v3_length {
        dissect_mst(&mut payload, ctx, layer, v3_length)?;
    }
    Ok(length)
}

fn dissect_mst(
    payload: &mut Cursor<'_>,
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    v3_length: usize,
) -> Result<(), DissectError> {
    let offset = payload.offset();
    if v3_length < layout::MST_FIXED_LEN {
        let reason = format!("v3 length {v3_length} below {}", layout::MST_FIXED_LEN);
        ctx.mark_corrupt(layer, &DissectError::corrupt(offset, reason));
        return Ok(());
    }
    let selector = payload.read_u8()?;
    let config_name = payload.read_bytes(layout::MST_CONFIG_NAME_LEN)?;
    let revision = payload.read_u16_be()?;
    let digest = payload.read_bytes(layout::MST_DIGEST_LEN)?;
    let cist_cost = payload.read_u32_be()?;
    let cist_bridge: [u8; 8] = payload.read_array()?;
    let cist_hops = payload.read_u8()?;

    let name_end = config_name.iter().position(|&b| b == 0).unwrap_or(config_name.len());
    let mut line = format!(
        "MST config-id format {selector}, name {}, revision {revision}, digest ",
        String::from_utf8_lossy(&config_name[..name_end])
    );
    for byte in digest {
        let _ = write!(line, "{byte:02x}");
    }
    ctx.detail(layer, line);
    let line = format!(
        "CIST int-root-pathcost {cist_cost}, bridge-id {}, remaining-hops {cist_hops}",
        bridge(ctx.names(), &cist_bridge)
    );
    ctx.detail(layer, line);

    let msti_len = v3_length - layout::MST_FIXED_LEN;
    for item in TlvWalker::new(*payload, msti_len, MstiLayout) {
        let record = match item {
            Ok(record) => record,
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        };
        let mut body = record.body;
        let root: [u8; 8] = body.read_array()?;
        let cost = body.read_u32_be()?;
        let bridge_priority = body.read_u8()?;
        let port_priority = body.read_u8()?;
        let hops = body.read_u8()?;
        let line = format!(
            "MSTI {}, Flags [{}], regional-root-id {}, pathcost {cost}, \
             bridge-prio {}, port-prio {}, hops {hops}",
            u16::from_be_bytes([root[0], root[1]]) & 0x0fff,
            render_flags(record.type_code as u8, layout::BPDU_RSTP),
            bridge(ctx.names(), &root),
            u16::from(bridge_priority) << 8,
            u16::from(port_priority) << 4,
        );
        ctx.detail(layer, line);
    }
    payload.skip(payload.remaining().min(msti_len))?;
    Ok(())
}

fn render_flags(flags: u8, bpdu_type: u8) -> String {
    let mut parts = bit_names(layout::FLAGS, flags);
    if bpdu_type == layout::BPDU_RSTP {
        let role = (flags & layout::PORT_ROLE_MASK) >> layout::PORT_ROLE_SHIFT;
        parts.push(name_of(layout::PORT_ROLES, role));
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

/// Bridge identifier: priority and system id extension, then the MAC.
fn bridge(names: Names<'_>, id: &[u8; 8]) -> String {
    let [hi, lo, mac @ ..] = *id;
    format!("{:04x}.{}", u16::from_be_bytes([hi, lo]), names.mac(&mac))
}
