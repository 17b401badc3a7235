use std::fmt::Write as _;

use crate::engine::{Cursor, DissectError, Dissection, Layer, TlvRecord, TlvWalker};
use crate::names::Names;
use crate::protocols::common::{Prefix, bit_names, in_record, name_of, walk_failed};

use super::layout;

pub fn dissect_eigrp(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let length = payload.remaining();
    let version = payload.read_u8()?;
    if version != layout::VERSION {
        return Err(DissectError::corrupt(offset, format!("version {version}")));
    }
    let opcode = payload.read_u8()?;
    let checksum = payload.read_u16_be()?;
    let flags = payload.read_u32_be()?;
    let seq = payload.read_u32_be()?;
    let ack = payload.read_u32_be()?;
    let asn = payload.read_u32_be()?;

    let summary = format!(
        "EIGRP v{version}, opcode: {} ({opcode}), length: {length}",
        name_of(layout::OPCODE_NAMES, opcode)
    );
    let layer = ctx.push_layer(Layer::new("eigrp", offset, summary));
    let flag_names = bit_names(layout::FLAG_NAMES, flags);
    ctx.detail(
        layer,
        format!(
            "checksum: 0x{checksum:04x}, flags: [{}], seq: 0x{seq:08x}, ack: 0x{ack:08x}, AS: {asn}",
            if flag_names.is_empty() { "none".to_string() } else { flag_names.join(", ") }
        ),
    );

    for item in TlvWalker::over(payload, layout::TLV) {
        let tlv = match item {
            Ok(tlv) => tlv,
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        };
        let kind = tlv.type_code as u16;
        let name = name_of(layout::TLV_NAMES, kind);
        let decoded = match decode_tlv(&tlv, name, ctx.names()) {
            Ok(decoded) => decoded,
            Err(err) => {
                ctx.mark_corrupt(layer, &err);
                break;
            }
        };
        let mut line = format!("  {name} TLV (0x{kind:04x}), length: {}", tlv.declared_length);
        if let Some(decoded) = decoded {
            let _ = write!(line, ": {decoded}");
        }
        ctx.detail(layer, line);
    }
    Ok(length)
}

/// Bodies shorter than the fixed part of their type.
fn require_body(tlv: &TlvRecord<'_>, name: &str, min: usize) -> Result<(), DissectError> {
    if tlv.body_len() < min {
        return Err(DissectError::corrupt(
            tlv.offset,
            format!("{name} length {} below minimum {}", tlv.declared_length, min + 4),
        ));
    }
    Ok(())
}

fn decode_tlv(
    tlv: &TlvRecord<'_>,
    name: &str,
    names: Names<'_>,
) -> Result<Option<String>, DissectError> {
    let mut body = tlv.body;
    let text = match tlv.type_code as u16 {
        layout::TLV_GENERAL_PARAMETERS => {
            require_body(tlv, name, layout::GENERAL_PARAMETERS_LEN)?;
            let k: [u8; 5] = body.read_array()?;
            body.skip(1)?;
            let hold = body.read_u16_be()?;
            format!(
                "holdtime: {hold}s, k1 {}, k2 {}, k3 {}, k4 {}, k5 {}",
                k[0], k[1], k[2], k[3], k[4]
            )
        }
        layout::TLV_SOFTWARE_VERSION => {
            require_body(tlv, name, layout::SOFTWARE_VERSION_LEN)?;
            let [ios_major, ios_minor, eigrp_major, eigrp_minor]: [u8; 4] = body.read_array()?;
            format!("IOS version: {ios_major}.{ios_minor}, EIGRP version: {eigrp_major}.{eigrp_minor}")
        }
        layout::TLV_IPV4_INTERNAL => {
            require_body(tlv, name, layout::IPV4_INTERNAL_LEN)?;
            let nexthop = nexthop(&mut body, names)?;
            let metric = read_metric(&mut body)?;
            let prefix = in_record(tlv, name, Prefix::read(&mut body, 32))?;
            format!("prefix: {}, nexthop: {nexthop}, {metric}", prefix.ipv4())
        }
        layout::TLV_IPV4_EXTERNAL => {
            require_body(tlv, name, layout::IPV4_EXTERNAL_LEN)?;
            let nexthop = nexthop(&mut body, names)?;
            let origin: [u8; 4] = body.read_array()?;
            let origin_as = body.read_u32_be()?;
            let tag = body.read_u32_be()?;
            let external_metric = body.read_u32_be()?;
            body.skip(2)?;
            let protocol = body.read_u8()?;
            let _flags = body.read_u8()?;
            let metric = read_metric(&mut body)?;
            let prefix = in_record(tlv, name, Prefix::read(&mut body, 32))?;
            format!(
                "prefix: {}, nexthop: {nexthop}, origin-router {}, origin-as {origin_as}, tag 0x{tag:08x}, \
                 metric {external_metric}, protocol {} ({protocol}), {metric}",
                prefix.ipv4(),
                names.ipv4(&origin),
                name_of(layout::EXTERNAL_PROTOCOL_NAMES, protocol)
            )
        }
        _ => return Ok(None),
    };
    Ok(Some(text))
}

fn nexthop(body: &mut Cursor<'_>, names: Names<'_>) -> Result<String, DissectError> {
    let address: [u8; 4] = body.read_array()?;
    if address == [0; 4] {
        return Ok("self".to_string());
    }
    Ok(names.ipv4(&address).to_string())
}

/// Delay, bandwidth, MTU, hop count, reliability, load and two reserved bytes.
fn read_metric(body: &mut Cursor<'_>) -> Result<String, DissectError> {
    let delay = body.read_u32_be()?;
    let bandwidth = body.read_u32_be()?;
    let mtu = body.read_u24_be()?;
    let hops = body.read_u8()?;
    let reliability = body.read_u8()?;
    let load = body.read_u8()?;
    body.skip(2)?;
    let bandwidth_kbps = match bandwidth {
        0 => 0,
        scaled => layout::BANDWIDTH_SCALE / u64::from(scaled),
    };
    Ok(format!(
        "delay {} ms, bandwidth {bandwidth_kbps} Kbps, mtu {mtu}, hop {hops}, reliability {reliability}, load {load}",
        delay / 100
    ))
}
