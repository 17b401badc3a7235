use std::fmt::Write as _;

use crate::engine::{
    Cursor, DissectError, Dissection, Layer, LayerId, LengthMode, OptionTlv, TlvRecord,
    TlvWalker,
};
use crate::protocols::common::{dispatch_ports, hex, walk_failed};

use super::layout;

const OPTIONS: OptionTlv = OptionTlv {
    end: Some(layout::OPT_EOL),
    single_byte: &[layout::OPT_EOL, layout::OPT_NOP],
    length_mode: LengthMode::IncludesHeader,
};

pub fn dissect_tcp(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let src_port = payload.read_u16_be()?;
    let dst_port = payload.read_u16_be()?;
    let seq = payload.read_u32_be()?;
    let ack = payload.read_u32_be()?;
    let off_flags = payload.read_u16_be()?;
    let window = payload.read_u16_be()?;
    let checksum = payload.read_u16_be()?;
    let urgent = payload.read_u16_be()?;

    let header_len = usize::from(off_flags >> 12) * 4;
    if header_len < layout::MIN_HEADER_LEN {
        return Err(DissectError::corrupt(
            offset,
            format!("header length {header_len} below {}", layout::MIN_HEADER_LEN),
        ));
    }
    let flags = off_flags & 0x01ff;
    let flag_text: String = layout::FLAGS
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, name)| *name)
        .collect();

    let options = payload.take(header_len - layout::MIN_HEADER_LEN)?;
    let data_len = payload.remaining();

    let names = ctx.names();
    let mut summary = format!(
        "TCP {} > {}: Flags [{}], seq {seq}",
        names.tcp_port(src_port),
        names.tcp_port(dst_port),
        if flag_text.is_empty() { "none" } else { flag_text.as_str() }
    );
    if flags & layout::FLAG_ACK != 0 {
        let _ = write!(summary, ", ack {ack}");
    }
    let _ = write!(summary, ", win {window}, length {data_len}");
    let layer = ctx.push_layer(Layer::new("tcp", offset, summary));
    ctx.detail(layer, format!("cksum 0x{checksum:04x}, urg {urgent}"));

    let mut rendered = Vec::new();
    for item in TlvWalker::over(options, OPTIONS) {
        match item {
            Ok(option) => rendered.push(render_option(&option)),
            Err(err) => {
                walk_failed(ctx, layer, err)?;
                break;
            }
        }
    }
    if !rendered.is_empty() {
        let _ = write!(ctx.layer_mut(layer).summary, ", options [{}]", rendered.join(","));
    }

    let inner = dispatch_ports(ctx, LayerId::TcpPort, src_port, dst_port, payload)?;
    Ok(header_len + inner)
}

fn render_option(option: &TlvRecord<'_>) -> String {
    let mut body = option.body;
    let kind = option.type_code as u8;
    let decoded = match (kind, body.remaining()) {
        (layout::OPT_EOL, _) => Some("eol".to_string()),
        (layout::OPT_NOP, _) => Some("nop".to_string()),
        (layout::OPT_MSS, 2) => body.read_u16_be().ok().map(|mss| format!("mss {mss}")),
        (layout::OPT_WSCALE, 1) => body.read_u8().ok().map(|shift| format!("wscale {shift}")),
        (layout::OPT_SACK_OK, 0) => Some("sackOK".to_string()),
        (layout::OPT_SACK, len) if len % 8 == 0 => Some(format!("sack {}", len / 8)),
        (layout::OPT_TIMESTAMP, 8) => {
            let value = body.read_u32_be().ok();
            let echo = body.read_u32_be().ok();
            value.zip(echo).map(|(value, echo)| format!("TS val {value} ecr {echo}"))
        }
        _ => None,
    };
    decoded.unwrap_or_else(|| format!("opt-{kind}:{}", hex(option.body.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DissectOptions;
    use crate::engine::{Outcome, builtin_registry};
    use crate::names::NameCache;

    fn segment(data_offset: u8, flags: u8, options: &[u8], data: &[u8]) -> Vec<u8> {
        let mut out = vec![0x30, 0x39, 0x1f, 0x90, 0, 0, 0, 1, 0, 0, 0, 2];
        out.extend_from_slice(&[data_offset << 4, flags, 0xff, 0xff, 0, 0, 0, 0]);
        out.extend_from_slice(options);
        out.extend_from_slice(data);
        out
    }

    fn run(data: &[u8]) -> (Result<usize, DissectError>, Vec<Layer>) {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let result = dissect_tcp(Cursor::new(data), &mut ctx);
        (result, ctx.into_layers())
    }

    #[test]
    fn syn_with_options() {
        let options = [2, 4, 0x05, 0xb4, 1, 3, 3, 7, 4, 2, 0, 0];
        let data = segment(8, 0x02, &options, &[]);
        let (result, layers) = run(&data);
        assert_eq!(result.unwrap(), 32);
        assert_eq!(
            layers[0].summary,
            "TCP 12345 > 8080: Flags [S], seq 1, win 65535, length 0, \
             options [mss 1460,nop,wscale 7,sackOK,eol]"
        );
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn data_offset_below_minimum_is_corrupt() {
        let data = segment(4, 0x10, &[], &[]);
        let (result, layers) = run(&data);
        assert_eq!(result.unwrap_err().outcome(), Outcome::Corrupt);
        assert!(layers.is_empty());
    }

    #[test]
    fn bad_option_length_marks_layer() {
        let data = segment(6, 0x18, &[1, 8, 9, 0], &[0xaa]);
        let (result, layers) = run(&data);
        assert_eq!(result.unwrap(), 25);
        assert_eq!(
            layers[0].summary,
            "TCP 12345 > 8080: Flags [P.], seq 1, ack 2, win 65535, length 1, options [nop]"
        );
        assert!(layers[0].marker.is_some());
        assert_eq!(layers[1].protocol, "data");
    }
}
