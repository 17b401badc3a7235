use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerId, TlvWalker, Truncated};
use crate::names::Names;
use crate::protocols::common::{bit_names, in_record, name_of, walk_failed};

use super::layout;

/// Slow protocols Ethertype: a subtype byte selects the protocol.
pub fn dissect_slow(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let subtype = payload.read_u8()?;
    let inner = ctx.dispatch(LayerId::SlowSubtype, u64::from(subtype), payload)?;
    Ok(1 + inner)
}

pub fn dissect_lacp(payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    dissect_aggregation(payload, ctx, &LACP)
}

pub fn dissect_marker(payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    dissect_aggregation(payload, ctx, &MARKER)
}

struct Aggregation {
    protocol: &'static str,
    label: &'static str,
    tlv_names: &'static [(u8, &'static str)],
    expected_len: fn(u8) -> Option<usize>,
    render: fn(u8, &mut Cursor<'_>, Names<'_>) -> Result<Option<String>, Truncated>,
}

const LACP: Aggregation = Aggregation {
    protocol: "lacp",
    label: "LACP",
    tlv_names: layout::LACP_TLV_NAMES,
    expected_len: |kind| match kind {
        layout::LACP_TLV_ACTOR_INFO | layout::LACP_TLV_PARTNER_INFO => {
            Some(layout::LACP_ACTOR_PARTNER_LEN)
        }
        layout::LACP_TLV_COLLECTOR_INFO => Some(layout::LACP_COLLECTOR_LEN),
        _ => None,
    },
    render: render_lacp,
};

const MARKER: Aggregation = Aggregation {
    protocol: "marker",
    label: "MARKER",
    tlv_names: layout::MARKER_TLV_NAMES,
    expected_len: |kind| match kind {
        layout::MARKER_TLV_MARKER_INFO | layout::MARKER_TLV_RESPONSE_INFO => {
            Some(layout::MARKER_INFO_LEN)
        }
        _ => None,
    },
    render: render_marker,
};

fn dissect_aggregation(
    mut payload: Cursor<'_>,
    ctx: &mut Dissection<'_>,
    kind: &Aggregation,
) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let pdu_len = payload.remaining();
    let version = payload.read_u8()?;
    let summary = format!("{}v{version}, length {}", kind.label, pdu_len + 1);
    let layer = ctx.push_layer(Layer::new(kind.protocol, offset, summary));

    for item in TlvWalker::over(payload, layout::SLOW_TLV) {
        let record = match item {
            Ok(record) if record.terminator => break,
            Ok(record) => record,
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        };
        let tlv = record.type_code as u8;
        let name = name_of(kind.tlv_names, tlv);
        if let Some(expected) = (kind.expected_len)(tlv) {
            if record.declared_length != expected {
                let reason = format!(
                    "{name} length {} != expected {expected}",
                    record.declared_length
                );
                ctx.mark_corrupt(layer, &DissectError::corrupt(record.offset, reason));
                break;
            }
        }
        let mut body = record.body;
        let decoded = match in_record(&record, name, (kind.render)(tlv, &mut body, ctx.names())) {
            Ok(decoded) => decoded,
            Err(err) => {
                ctx.mark_corrupt(layer, &err);
                break;
            }
        };
        let mut line = format!("{name} TLV (0x{tlv:02x}), length {}", record.declared_length);
        if let Some(decoded) = decoded {
            line.push_str(": ");
            line.push_str(&decoded);
        }
        ctx.detail(layer, line);
    }
    Ok(pdu_len)
}

fn render_lacp(
    tlv: u8,
    body: &mut Cursor<'_>,
    names: Names<'_>,
) -> Result<Option<String>, Truncated> {
    match tlv {
        layout::LACP_TLV_ACTOR_INFO | layout::LACP_TLV_PARTNER_INFO => {
            let sys_pri = body.read_u16_be()?;
            let sys: [u8; 6] = body.read_array()?;
            let key = body.read_u16_be()?;
            let port_pri = body.read_u16_be()?;
            let port = body.read_u16_be()?;
            let state = body.read_u8()?;
            Ok(Some(format!(
                "System {}, System Priority {sys_pri}, Key {key}, Port {port}, \
                 Port Priority {port_pri}, State Flags [{}]",
                names.mac(&sys),
                bit_names(layout::LACP_STATE_FLAGS, state).join(", ")
            )))
        }
        layout::LACP_TLV_COLLECTOR_INFO => {
            let max_delay = body.read_u16_be()?;
            Ok(Some(format!("max delay {max_delay}")))
        }
        _ => Ok(None),
    }
}

fn render_marker(
    tlv: u8,
    body: &mut Cursor<'_>,
    names: Names<'_>,
) -> Result<Option<String>, Truncated> {
    match tlv {
        layout::MARKER_TLV_MARKER_INFO | layout::MARKER_TLV_RESPONSE_INFO => {
            let port = body.read_u16_be()?;
            let sys: [u8; 6] = body.read_array()?;
            let transaction = body.read_u32_be()?;
            Ok(Some(format!(
                "Request System {}, Request Port {port}, Transaction ID 0x{transaction:08x}",
                names.mac(&sys)
            )))
        }
        _ => Ok(None),
    }
}

/// Ethernet link OAM. Only Information PDUs carry a TLV list.
pub fn dissect_oam(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let pdu_len = payload.remaining();
    let flags = payload.read_u16_be()?;
    let code = payload.read_u8()?;
    let summary = format!(
        "OAMPDU, code {} (0x{code:02x}), flags [{}], length {}",
        name_of(layout::OAM_CODES, code),
        bit_names(layout::OAM_FLAGS, flags).join(", "),
        pdu_len + 1
    );
    let layer = ctx.push_layer(Layer::new("oam", offset, summary));
    if code != layout::OAM_CODE_INFO {
        return Ok(pdu_len);
    }

    for item in TlvWalker::over(payload, layout::SLOW_TLV) {
        let record = match item {
            Ok(record) if record.terminator => break,
            Ok(record) => record,
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        };
        let tlv = record.type_code as u8;
        let name = name_of(layout::OAM_INFO_NAMES, tlv);
        let mut body = record.body;
        let decoded = match tlv {
            layout::OAM_INFO_LOCAL | layout::OAM_INFO_REMOTE => {
                if record.declared_length != layout::OAM_INFO_LEN {
                    let reason = format!(
                        "{name} length {} != expected {}",
                        record.declared_length,
                        layout::OAM_INFO_LEN
                    );
                    ctx.mark_corrupt(layer, &DissectError::corrupt(record.offset, reason));
                    break;
                }
                in_record(&record, name, oam_information(&mut body))
            }
            layout::OAM_INFO_ORG_SPECIFIC => in_record(&record, name, body.read_u24_be())
                .map(|oui| format!("OUI {}", ctx.names().oui(oui))),
            _ => Ok(format!("length {}", record.declared_length)),
        };
        match decoded {
            Ok(line) => ctx.detail(layer, format!("{name} TLV (0x{tlv:02x}): {line}")),
            Err(err) => {
                ctx.mark_corrupt(layer, &err);
                break;
            }
        }
    }
    Ok(pdu_len)
}

fn oam_information(body: &mut Cursor<'_>) -> Result<String, Truncated> {
    let version = body.read_u8()?;
    let revision = body.read_u16_be()?;
    let state = body.read_u8()?;
    let config = body.read_u8()?;
    let max_pdu = body.read_u16_be()?;
    let oui = body.read_u24_be()?;
    Ok(format!(
        "version {version}, revision {revision}, state 0x{state:02x}, config 0x{config:02x}, \
         max PDU {max_pdu}, OUI 0x{oui:06x}"
    ))
}
