use std::fmt::Write as _;

use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerRef, TlvRecord, TlvWalker};
use crate::names::Names;
use crate::protocols::common::{Prefix, hex, in_record, name_of, walk_failed};

use super::layout;

pub fn dissect_ldp(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let mut consumed = 0;
    while !payload.is_empty() {
        consumed += dissect_pdu(&mut payload, ctx)?;
    }
    Ok(consumed)
}

fn dissect_pdu(payload: &mut Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let version = payload.read_u16_be()?;
    if version != layout::VERSION {
        return Err(DissectError::corrupt(offset, format!("version {version}")));
    }
    let pdu_len = usize::from(payload.read_u16_be()?);
    if pdu_len < layout::PDU_ID_LEN {
        return Err(DissectError::corrupt(
            offset,
            format!("pdu length {pdu_len} below {}", layout::PDU_ID_LEN),
        ));
    }
    let lsr_id: [u8; 4] = payload.read_array()?;
    let label_space = payload.read_u16_be()?;
    let summary = format!(
        "LDP, Label-Space-ID: {}:{label_space}, pdu-length: {pdu_len}",
        ctx.names().ipv4(&lsr_id)
    );
    let layer = ctx.push_layer(Layer::new("ldp", offset, summary));

    let messages_len = pdu_len - layout::PDU_ID_LEN;
    let mut message_names = Vec::new();
    for item in TlvWalker::new(*payload, messages_len, layout::MESSAGE_TLV) {
        let message = match item {
            Ok(message) => message,
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        };
        let msg_type = message.type_code as u16;
        let name = name_of(layout::MESSAGE_NAMES, msg_type);
        message_names.push(name);
        let mut body = message.body;
        let id = body.read_u32_be()?;
        let mut line = format!(
            "{name} Message (0x{msg_type:04x}), length: {}, Message ID: 0x{id:08x}",
            message.declared_length
        );
        if message.flags & 0x8000 != 0 {
            line.push_str(", Flags: [ignore if unknown]");
        }
        ctx.detail(layer, line);
        if !dissect_params(ctx, layer, body)? {
            break;
        }
    }
    payload.skip(messages_len)?;

    if !message_names.is_empty() {
        let _ = write!(ctx.layer_mut(layer).summary, ", {}", message_names.join(", "));
    }
    Ok(layout::PDU_PREFIX_LEN + pdu_len)
}

/// Walk one message's parameters. Returns false once the layer has been
/// marked corrupt.
fn dissect_params(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    body: Cursor<'_>,
) -> Result<bool, DissectError> {
    for item in TlvWalker::over(body, layout::PARAM_TLV) {
        let param = match item {
            Ok(param) => param,
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                return Ok(false);
            }
        };
        let tlv = param.type_code as u16;
        let name = name_of(layout::TLV_NAMES, tlv);
        let decoded = match in_record(&param, name, decode_param(&param, ctx.names())) {
            Ok(decoded) => decoded,
            Err(err) => {
                ctx.mark_corrupt(layer, &err);
                return Ok(false);
            }
        };
        let mut line = format!("  {name} TLV (0x{tlv:04x}), length: {}", param.declared_length);
        if let Some(decoded) = decoded {
            line.push_str(": ");
            line.push_str(&decoded);
        }
        ctx.detail(layer, line);
    }
    Ok(true)
}

fn decode_param(param: &TlvRecord<'_>, names: Names<'_>) -> Result<Option<String>, DissectError> {
    let mut body = param.body;
    let text = match param.type_code as u16 {
        layout::TLV_COMMON_HELLO => {
            let hold = body.read_u16_be()?;
            let flags = body.read_u16_be()?;
            let kind = if flags & layout::HELLO_TARGETED != 0 {
                "Targeted Hello"
            } else {
                "Link Hello"
            };
            let mut text = format!("Hold Time: {hold}s, Flags: [{kind}");
            if flags & layout::HELLO_REQUEST_TARGETED != 0 {
                text.push_str(", Request for targeted Hellos");
            }
            text.push(']');
            text
        }
        layout::TLV_IPV4_TRANSPORT_ADDR => {
            let address: [u8; 4] = body.read_array()?;
            names.ipv4(&address).to_string()
        }
        layout::TLV_IPV6_TRANSPORT_ADDR => {
            let address: [u8; 16] = body.read_array()?;
            names.ipv6(&address).to_string()
        }
        layout::TLV_CONFIG_SEQ_NUMBER => format!("Sequence Number: {}", body.read_u32_be()?),
        layout::TLV_COMMON_SESSION => {
            let version = body.read_u16_be()?;
            let keepalive = body.read_u16_be()?;
            let flags = body.read_u8()?;
            let path_vector_limit = body.read_u8()?;
            let max_pdu = body.read_u16_be()?;
            let receiver: [u8; 4] = body.read_array()?;
            let receiver_space = body.read_u16_be()?;
            let mode = if flags & 0x80 != 0 {
                "Downstream On Demand"
            } else {
                "Downstream Unsolicited"
            };
            let loop_detection = if flags & 0x40 != 0 { "enabled" } else { "disabled" };
            format!(
                "Version: {version}, Keepalive: {keepalive}s, Flags: [{mode}, Loop Detection {loop_detection}], \
                 Path Vector Limit: {path_vector_limit}, Max PDU: {max_pdu}, \
                 Receiver Label-Space-ID: {}:{receiver_space}",
                names.ipv4(&receiver)
            )
        }
        layout::TLV_GENERIC_LABEL => {
            format!("Label: {}", body.read_u32_be()? & layout::LABEL_MASK)
        }
        layout::TLV_HOP_COUNT => format!("Hop Count: {}", body.read_u8()?),
        layout::TLV_STATUS => {
            let code = body.read_u32_be()?;
            let message_id = body.read_u32_be()?;
            let message_type = body.read_u16_be()?;
            format!(
                "Status Code: 0x{:08x}{}, Message ID: 0x{message_id:08x}, Message Type: {}",
                code & 0x3fff_ffff,
                if code & 0x8000_0000 != 0 { " (fatal)" } else { "" },
                name_of(layout::MESSAGE_NAMES, message_type)
            )
        }
        layout::TLV_ADDRESS_LIST => {
            let family = body.read_u16_be()?;
            let mut addresses = Vec::new();
            while !body.is_empty() {
                match family {
                    layout::AFNUM_INET => {
                        let address: [u8; 4] = body.read_array()?;
                        addresses.push(names.ipv4(&address).to_string());
                    }
                    layout::AFNUM_INET6 => {
                        let address: [u8; 16] = body.read_array()?;
                        addresses.push(names.ipv6(&address).to_string());
                    }
                    _ => return Ok(Some(format!("address family {family}"))),
                }
            }
            format!("Addresses: {}", addresses.join(", "))
        }
        layout::TLV_FEC => decode_fec(&mut body, names)?,
        _ => {
            if body.is_empty() {
                return Ok(None);
            }
            hex(body.as_slice())
        }
    };
    Ok(Some(text))
}

fn decode_fec(body: &mut Cursor<'_>, names: Names<'_>) -> Result<String, DissectError> {
    let mut elements = Vec::new();
    while !body.is_empty() {
        let element_offset = body.offset();
        let element = body.read_u8()?;
        match element {
            layout::FEC_WILDCARD => elements.push("Wildcard".to_string()),
            layout::FEC_PREFIX => {
                let family = body.read_u16_be()?;
                let text = match family {
                    layout::AFNUM_INET => Prefix::read(body, 32)?.ipv4(),
                    layout::AFNUM_INET6 => Prefix::read(body, 128)?.ipv6(),
                    other => {
                        return Err(DissectError::corrupt(
                            element_offset,
                            format!("FEC prefix address family {other}"),
                        ));
                    }
                };
                elements.push(format!("Prefix {text}"));
            }
            layout::FEC_HOSTADDRESS => {
                let family = body.read_u16_be()?;
                let len = usize::from(body.read_u8()?);
                let address = body.read_bytes(len)?;
                let text = match (family, <[u8; 4]>::try_from(address)) {
                    (layout::AFNUM_INET, Ok(v4)) => names.ipv4(&v4).to_string(),
                    _ => hex(address),
                };
                elements.push(format!("Host {text}"));
            }
            other => {
                return Err(DissectError::corrupt(
                    element_offset,
                    format!("FEC element type {other}"),
                ));
            }
        }
    }
    Ok(elements.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DissectOptions, Verbosity};
    use crate::names::NameCache;
    use crate::engine::{Outcome, builtin_registry};

    fn tlv(kind: u16, body: &[u8]) -> Vec<u8> {
        let mut out = kind.to_be_bytes().to_vec();
        out.extend_from_slice(&(body.len() as u16).to_be_bytes());
        out.extend_from_slice(body);
        out
    }

    fn message(kind: u16, id: u32, params: &[Vec<u8>]) -> Vec<u8> {
        let mut body = id.to_be_bytes().to_vec();
        for param in params {
            body.extend_from_slice(param);
        }
        tlv(kind, &body)
    }

    fn pdu(messages: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = messages.concat();
        let mut out = vec![0x00, 0x01];
        out.extend_from_slice(&((body.len() + 6) as u16).to_be_bytes());
        out.extend_from_slice(&[10, 0, 0, 1, 0, 0]);
        out.extend_from_slice(&body);
        out
    }

    fn hello() -> Vec<u8> {
        message(
            layout::MSG_HELLO,
            7,
            &[
                tlv(layout::TLV_COMMON_HELLO, &[0x00, 0x0f, 0x00, 0x00]),
                tlv(layout::TLV_IPV4_TRANSPORT_ADDR, &[10, 0, 0, 1]),
            ],
        )
    }

    fn verbose() -> DissectOptions {
        DissectOptions {
            verbosity: Verbosity::Verbose,
            ..DissectOptions::default()
        }
    }

    #[test]
    fn hello_pdu_with_nested_parameters() {
        let names = NameCache::default();
        let options = verbose();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let data = pdu(&[hello()]);
        let consumed = dissect_ldp(Cursor::new(&data), &mut ctx).unwrap();
        assert_eq!(consumed, data.len());
        let layer = &ctx.layers()[0];
        assert_eq!(layer.summary, "LDP, Label-Space-ID: 10.0.0.1:0, pdu-length: 30, Hello");
        assert_eq!(
            layer.details,
            vec![
                "Hello Message (0x0100), length: 20, Message ID: 0x00000007".to_string(),
                "  Common Hello Parameters TLV (0x0400), length: 4: Hold Time: 15s, Flags: [Link Hello]"
                    .to_string(),
                "  IPv4 Transport Address TLV (0x0401), length: 4: 10.0.0.1".to_string(),
            ]
        );
    }

    #[test]
    fn two_pdus_in_one_segment() {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let keepalive = message(layout::MSG_KEEPALIVE, 9, &[]);
        let mut data = pdu(&[hello()]);
        data.extend_from_slice(&pdu(&[keepalive]));
        let consumed = dissect_ldp(Cursor::new(&data), &mut ctx).unwrap();
        assert_eq!(consumed, data.len());
        assert_eq!(ctx.layers().len(), 2);
        assert!(ctx.layers()[1].summary.ends_with("Keep-Alive"));
    }

    #[test]
    fn short_parameter_is_local_corruption() {
        let names = NameCache::default();
        let options = verbose();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let bad = message(
            layout::MSG_LABEL_MAPPING,
            1,
            &[tlv(layout::TLV_GENERIC_LABEL, &[0x00, 0x01])],
        );
        let data = pdu(&[bad]);
        let consumed = dissect_ldp(Cursor::new(&data), &mut ctx).unwrap();
        assert_eq!(consumed, data.len());
        assert_eq!(
            ctx.layers()[0].marker.as_deref(),
            Some("[ldp: invalid, Generic Label length 2 too short]")
        );
    }

    #[test]
    fn fec_prefix_elements() {
        let names = NameCache::default();
        let options = verbose();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let mapping = message(
            layout::MSG_LABEL_MAPPING,
            2,
            &[
                tlv(layout::TLV_FEC, &[0x02, 0x00, 0x01, 24, 192, 0, 2]),
                tlv(layout::TLV_GENERIC_LABEL, &[0x00, 0x00, 0x00, 0x10]),
            ],
        );
        let data = pdu(&[mapping]);
        dissect_ldp(Cursor::new(&data), &mut ctx).unwrap();
        let details = &ctx.layers()[0].details;
        assert_eq!(details[1], "  FEC TLV (0x0100), length: 7: Prefix 192.0.2.0/24");
        assert_eq!(details[2], "  Generic Label TLV (0x0200), length: 4: Label: 16");
    }

    #[test]
    fn message_overrunning_pdu_is_local_corruption() {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let mut data = pdu(&[hello()]);
        // Claim two more body bytes than the PDU holds.
        data[13] += 2;
        let consumed = dissect_ldp(Cursor::new(&data), &mut ctx).unwrap();
        assert_eq!(consumed, data.len());
        assert!(ctx.layers()[0].marker.is_some());
    }

    #[test]
    fn short_capture_is_truncated() {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let data = pdu(&[hello()]);
        let err = dissect_ldp(Cursor::new(&data[..20]), &mut ctx).unwrap_err();
        assert_eq!(err.outcome(), Outcome::Truncated);
    }
}
