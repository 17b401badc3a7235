use std::fmt::Write as _;

use crate::engine::{
    Cursor, DissectError, Dissection, Layer, LayerId, LayerRef, LengthMode, OptionTlv, TlvWalker,
};
use crate::protocols::common::{declared_region, name_of, walk_failed};

use super::layout;

const OPTIONS: OptionTlv = OptionTlv {
    end: None,
    single_byte: &[layout::OPT_PAD1],
    length_mode: LengthMode::BodyOnly,
};

pub fn dissect_ipv6(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let first = payload.read_u32_be()?;
    let version = (first >> 28) as u8;
    if version != layout::VERSION {
        return Err(DissectError::corrupt(offset, format!("IP version {version}")));
    }
    let flow = first & 0x000f_ffff;
    let payload_len = usize::from(payload.read_u16_be()?);
    let mut next = payload.read_u8()?;
    let hop_limit = payload.read_u8()?;
    let src: [u8; 16] = payload.read_array()?;
    let dst: [u8; 16] = payload.read_array()?;

    let mut summary = format!("IP6 {} > {}: ", ctx.names().ipv6(&src), ctx.names().ipv6(&dst));
    let layer = ctx.push_layer(Layer::new("ip6", offset, String::new()));
    ctx.detail(layer, format!("flowlabel 0x{flow:05x}"));

    let (mut region, complete) = declared_region(&mut payload, payload_len);
    let mut ext_len = 0;
    let mut later_fragment = false;
    loop {
        let ext_offset = region.offset();
        match next {
            layout::NH_HOP_BY_HOP | layout::NH_DEST_OPTS => {
                let header = next;
                next = region.read_u8()?;
                let len = (usize::from(region.read_u8()?) + 1) * layout::EXT_UNIT;
                let options = extension_body(&mut region, len - 2, complete, ext_offset)?;
                walk_options(ctx, layer, options)?;
                summary.push_str(if header == layout::NH_HOP_BY_HOP { "HBH " } else { "DSTOPT " });
                ext_len += len;
            }
            layout::NH_ROUTING => {
                next = region.read_u8()?;
                let len = (usize::from(region.read_u8()?) + 1) * layout::EXT_UNIT;
                let routing_type = region.peek_u8()?;
                extension_body(&mut region, len - 2, complete, ext_offset)?;
                let _ = write!(summary, "srcrt (type {routing_type}) ");
                ext_len += len;
            }
            layout::NH_FRAGMENT => {
                next = region.read_u8()?;
                region.skip(1)?;
                let field = region.read_u16_be()?;
                let ident = region.read_u32_be()?;
                let frag_offset = field & layout::FRAGMENT_OFFSET_MASK;
                let more = field & layout::FRAGMENT_MORE != 0;
                let _ = write!(
                    summary,
                    "frag (0x{ident:08x}:{frag_offset}{}) ",
                    if more { "+" } else { "" }
                );
                later_fragment |= frag_offset != 0;
                ext_len += layout::FRAGMENT_HEADER_LEN;
            }
            _ => break,
        }
    }

    let _ = write!(
        summary,
        "{} ({next}), hlim {hop_limit}, length {payload_len}",
        ctx.names().ip_proto(next)
    );
    ctx.layer_mut(layer).summary = summary;

    let consumed = if next == layout::NH_NONE || later_fragment {
        ctx.raw_payload(region)
    } else {
        ctx.dispatch(LayerId::IpProto, u64::from(next), region)?
    };
    Ok(layout::HEADER_LEN + ext_len + consumed)
}

/// Split off an extension header body. When the whole payload was captured,
/// running out of bytes means the header overruns the payload length.
fn extension_body<'a>(
    region: &mut Cursor<'a>,
    len: usize,
    complete: bool,
    offset: usize,
) -> Result<Cursor<'a>, DissectError> {
    match region.take(len) {
        Ok(body) => Ok(body),
        Err(truncated) if complete => Err(DissectError::corrupt(
            offset,
            format!(
                "extension header overruns payload by {} bytes",
                truncated.needed - truncated.available
            ),
        )),
        Err(truncated) => Err(truncated.into()),
    }
}

fn walk_options(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    options: Cursor<'_>,
) -> Result<(), DissectError> {
    for item in TlvWalker::over(options, OPTIONS) {
        match item {
            Ok(option) if option.type_code == u32::from(layout::OPT_PAD1) => {}
            Ok(option) => {
                let name = name_of(layout::OPTION_NAMES, option.type_code as u8);
                ctx.detail(
                    layer,
                    format!("option {name} (0x{:02x}), length {}", option.type_code, option.body_len()),
                );
            }
            Err(err) => return walk_failed(ctx, layer, err),
        }
    }
    Ok(())
}
