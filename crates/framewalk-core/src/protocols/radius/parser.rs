use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerRef, TlvRecord, TlvWalker};
use crate::names::Names;
use crate::protocols::common::{declared_region, hex, in_record, name_of, walk_failed};

use super::layout::{self, ValueKind};

pub fn dissect_radius(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let code = payload.read_u8()?;
    let id = payload.read_u8()?;
    let length = usize::from(payload.read_u16_be()?);
    if !(layout::HEADER_LEN..=layout::MAX_LEN).contains(&length) {
        return Err(DissectError::corrupt(
            offset,
            format!("length {length} outside {}..{}", layout::HEADER_LEN, layout::MAX_LEN),
        ));
    }
    let authenticator: [u8; layout::AUTHENTICATOR_LEN] = payload.read_array()?;

    let name = match name_of(layout::CODE_NAMES, code) {
        "unknown" => "Unknown Command",
        known => known,
    };
    let summary = format!("RADIUS, {name} ({code}), id: 0x{id:02x} length: {length}");
    let layer = ctx.push_layer(Layer::new("radius", offset, summary));
    ctx.detail(layer, format!("Authenticator: {}", hex(&authenticator)));

    let attrs_len = length - layout::HEADER_LEN;
    let (region, complete) = declared_region(&mut payload, attrs_len);
    let captured = region.remaining();
    let walker = if complete || ctx.capture_is_short() {
        TlvWalker::new(region, attrs_len, layout::ATTRIBUTE_TLV)
    } else {
        let err = DissectError::corrupt(
            offset,
            format!("length {length} exceeds {} bytes of payload", layout::HEADER_LEN + captured),
        );
        ctx.mark_corrupt(layer, &err);
        TlvWalker::over(region, layout::ATTRIBUTE_TLV)
    };
    for item in walker {
        let attr = match item {
            Ok(attr) => attr,
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        };
        if let Err(err) = dissect_attribute(ctx, layer, &attr) {
            ctx.mark_corrupt(layer, &err);
            break;
        }
    }

    // Bytes past the RADIUS length are padding as far as RADIUS is concerned.
    Ok(layout::HEADER_LEN + captured + ctx.raw_payload(payload))
}

fn attribute_info(kind: u8) -> (&'static str, ValueKind) {
    layout::ATTRIBUTES
        .iter()
        .find(|(code, _, _)| *code == kind)
        .map_or(("Unknown Attribute", ValueKind::Octets), |(_, name, value)| (*name, *value))
}

fn dissect_attribute(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    attr: &TlvRecord<'_>,
) -> Result<(), DissectError> {
    let kind = attr.type_code as u8;
    let (name, value_kind) = attribute_info(kind);
    let prefix = format!("  {name} Attribute ({kind}), length: {}", attr.declared_length);

    if value_kind != ValueKind::Vendor {
        let value = decode_value(attr, name, value_kind, ctx.names())?;
        ctx.detail(layer, format!("{prefix}, Value: {value}"));
        return Ok(());
    }

    let mut body = attr.body;
    let vendor = in_record(attr, name, body.read_u32_be())?;
    let vendor_name = match name_of(layout::VENDOR_NAMES, vendor) {
        "unknown" => "Unknown Vendor",
        known => known,
    };
    ctx.detail(layer, format!("{prefix}, Value: Vendor: {vendor_name} ({vendor})"));
    for item in TlvWalker::over(body, layout::ATTRIBUTE_TLV) {
        let sub = item?;
        ctx.detail(
            layer,
            format!(
                "    Vendor Attribute: {}, Length: {}, Value: {}",
                sub.type_code,
                sub.declared_length,
                text_or_hex(sub.body.as_slice())
            ),
        );
    }
    Ok(())
}

fn decode_value(
    attr: &TlvRecord<'_>,
    name: &str,
    kind: ValueKind,
    names: Names<'_>,
) -> Result<String, DissectError> {
    let body = attr.body.as_slice();
    let text = match kind {
        ValueKind::Text => printable(body),
        ValueKind::Octets | ValueKind::Vendor => format!("0x{}", hex(body)),
        ValueKind::Address => names.ipv4(&fixed::<4>(attr, name)?).to_string(),
        ValueKind::Address6 => names.ipv6(&fixed::<16>(attr, name)?).to_string(),
        ValueKind::Integer => u32::from_be_bytes(fixed::<4>(attr, name)?).to_string(),
        ValueKind::Enumerated(values) => {
            let value = u32::from_be_bytes(fixed::<4>(attr, name)?);
            format!("{} ({value})", name_of(values, value))
        }
    };
    Ok(text)
}

/// The value of a fixed-size attribute, which must fill the body exactly.
fn fixed<const N: usize>(attr: &TlvRecord<'_>, name: &str) -> Result<[u8; N], DissectError> {
    <[u8; N]>::try_from(attr.body.as_slice()).map_err(|_| {
        DissectError::corrupt(
            attr.offset,
            format!("{name} value length {} != {N}", attr.body_len()),
        )
    })
}

fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { char::from(b) } else { '.' })
        .collect()
}

fn text_or_hex(bytes: &[u8]) -> String {
    if !bytes.is_empty() && bytes.iter().all(|&b| b.is_ascii_graphic() || b == b' ') {
        printable(bytes)
    } else {
        format!("0x{}", hex(bytes))
    }
}
