use std::fmt::Write as _;

use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerRef, TlvWalker, Truncated};
use crate::protocols::common::{declared_region, hex, in_record, name_of};

use super::{layout, update};

/// Every message in a TCP payload, one layer each.
pub fn dissect_bgp(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let mut consumed = 0;
    while !payload.is_empty() {
        let rest = payload.as_slice();
        match find_marker(rest) {
            Some(0) => {}
            Some(skip) => {
                tracing::trace!(offset = payload.offset(), skip, "resynchronising on BGP marker");
                payload.skip(skip)?;
                consumed += skip;
            }
            None if rest.iter().all(|&byte| byte == 0xff) => {
                // A marker cut short by the capture.
                payload.require(layout::MARKER_LEN)?;
            }
            None => {
                consumed += ctx.raw_payload(payload);
                break;
            }
        }
        consumed += dissect_message(&mut payload, ctx)?;
    }
    Ok(consumed)
}

fn find_marker(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(layout::MARKER_LEN)
        .position(|window| window.iter().all(|&byte| byte == 0xff))
}

fn dissect_message(payload: &mut Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    payload.skip(layout::MARKER_LEN)?;
    let length = usize::from(payload.read_u16_be()?);
    let msg_type = payload.read_u8()?;
    if length < layout::HEADER_LEN {
        return Err(DissectError::corrupt(
            offset,
            format!("message length {length} < {}", layout::HEADER_LEN),
        ));
    }
    let name = name_of(layout::MESSAGE_NAMES, msg_type);
    let summary = if name == "unknown" {
        format!("BGP unknown message type {msg_type}, length {length}")
    } else {
        format!("BGP {name}, length {length}")
    };
    let layer = ctx.push_layer(Layer::new("bgp", offset, summary));

    let body_len = length - layout::HEADER_LEN;
    let (mut body, complete) = declared_region(payload, body_len);
    let result = match msg_type {
        layout::MSG_OPEN => dissect_open(ctx, layer, &mut body),
        layout::MSG_UPDATE => update::dissect_update(ctx, layer, &mut body),
        layout::MSG_NOTIFICATION => dissect_notification(ctx, layer, &mut body),
        layout::MSG_ROUTE_REFRESH => dissect_route_refresh(ctx, layer, &mut body),
        _ => Ok(()),
    };
    if let Err(err) = result {
        match err {
            // Every byte of the message was captured, so running out means a
            // length inside the body disagrees with the message length.
            DissectError::Truncated { offset, needed, .. } if complete => {
                let reason = format!("{name} body overrun at offset {offset} (need {needed} bytes)");
                ctx.mark_corrupt(layer, &DissectError::corrupt(offset, reason));
            }
            DissectError::Truncated { .. } => return Err(err),
            corrupt => ctx.mark_corrupt(layer, &corrupt),
        }
    }
    if !complete {
        let captured = payload.offset() - offset;
        return Err(Truncated {
            offset: payload.offset(),
            needed: length - captured,
            available: 0,
        }
        .into());
    }
    Ok(length)
}

fn dissect_open(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    body: &mut Cursor<'_>,
) -> Result<(), DissectError> {
    let version = body.read_u8()?;
    let my_as = body.read_u16_be()?;
    let hold_time = body.read_u16_be()?;
    let id: [u8; 4] = body.read_array()?;
    let params_len = usize::from(body.read_u8()?);
    let line = format!(
        ", version {version}, my AS {my_as}, holdtime {hold_time}s, ID {}",
        ctx.names().ipv4(&id)
    );
    ctx.layer_mut(layer).summary.push_str(&line);
    ctx.detail(layer, format!("Optional parameters, length: {params_len}"));

    for param in TlvWalker::new(*body, params_len, layout::OPEN_PARAM_TLV) {
        let param = param?;
        let kind = param.type_code as u8;
        let name = name_of(layout::OPT_NAMES, kind);
        ctx.detail(
            layer,
            format!("  Option {name} ({kind}), length: {}", param.declared_length),
        );
        if kind != layout::OPT_CAPABILITIES {
            ctx.detail(layer, format!("    no decoder for option {kind}"));
            continue;
        }
        for capability in TlvWalker::over(param.body, layout::OPEN_PARAM_TLV) {
            let capability = capability?;
            let code = capability.type_code as u8;
            let name = name_of(layout::CAPABILITY_NAMES, code);
            let mut cap_body = capability.body;
            let decoded = in_record(&capability, name, decode_capability(code, &mut cap_body))?;
            let mut line = format!("    {name} ({code}), length: {}", capability.declared_length);
            if let Some(decoded) = decoded {
                line.push_str(": ");
                line.push_str(&decoded);
            }
            ctx.detail(layer, line);
        }
    }
    body.skip(params_len)?;
    Ok(())
}

fn decode_capability(code: u8, body: &mut Cursor<'_>) -> Result<Option<String>, Truncated> {
    let text = match code {
        layout::CAP_MP => {
            let afi = body.read_u16_be()?;
            body.skip(1)?;
            let safi = body.read_u8()?;
            afi_safi(afi, safi)
        }
        layout::CAP_AS4 => format!("4-Byte AS {}", body.read_u32_be()?),
        layout::CAP_GRACEFUL_RESTART => {
            let flags_time = body.read_u16_be()?;
            let mut text = format!("Restart Time {}s", flags_time & 0x0fff);
            if flags_time & 0x8000 != 0 {
                text.push_str(", Restart Flags [R]");
            }
            while !body.is_empty() {
                let afi = body.read_u16_be()?;
                let safi = body.read_u8()?;
                let flags = body.read_u8()?;
                let _ = write!(
                    text,
                    ", {}, Forwarding state preserved: {}",
                    afi_safi(afi, safi),
                    if flags & 0x80 != 0 { "yes" } else { "no" }
                );
            }
            text
        }
        layout::CAP_ADD_PATH => {
            let mut entries = Vec::new();
            while !body.is_empty() {
                let afi = body.read_u16_be()?;
                let safi = body.read_u8()?;
                let mode = match body.read_u8()? {
                    1 => "Receive",
                    2 => "Send",
                    3 => "Send/Receive",
                    _ => "Unknown",
                };
                entries.push(format!("{}, {mode}", afi_safi(afi, safi)));
            }
            entries.join("; ")
        }
        layout::CAP_FQDN => {
            let host_len = usize::from(body.read_u8()?);
            let host = String::from_utf8_lossy(body.read_bytes(host_len)?).into_owned();
            let domain_len = usize::from(body.read_u8()?);
            let domain = String::from_utf8_lossy(body.read_bytes(domain_len)?);
            format!("hostname \"{host}\", domain \"{domain}\"")
        }
        layout::CAP_ROUTE_REFRESH
        | layout::CAP_ENHANCED_ROUTE_REFRESH
        | layout::CAP_ROUTE_REFRESH_CISCO => return Ok(None),
        _ if body.is_empty() => return Ok(None),
        _ => format!("no decoder, {}", hex(body.rest())),
    };
    Ok(Some(text))
}

fn dissect_notification(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    body: &mut Cursor<'_>,
) -> Result<(), DissectError> {
    let code = body.read_u8()?;
    let subcode = body.read_u8()?;
    let line = format!(
        ", error {} ({code}), subcode {subcode}",
        name_of(layout::NOTIFICATION_NAMES, code)
    );
    ctx.layer_mut(layer).summary.push_str(&line);
    let data = body.rest();
    if !data.is_empty() {
        ctx.detail(layer, format!("data: {}", hex(data)));
    }
    Ok(())
}

fn dissect_route_refresh(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    body: &mut Cursor<'_>,
) -> Result<(), DissectError> {
    let afi = body.read_u16_be()?;
    body.skip(1)?;
    let safi = body.read_u8()?;
    let line = format!(", {}", afi_safi(afi, safi));
    ctx.layer_mut(layer).summary.push_str(&line);
    Ok(())
}

pub(super) fn afi_safi(afi: u16, safi: u8) -> String {
    format!(
        "AFI {} ({afi}), SAFI {} ({safi})",
        name_of(layout::AFI_NAMES, afi),
        name_of(layout::SAFI_NAMES, safi)
    )
}
