use crate::config::Verbosity;

use super::context::Dissection;
use super::cursor::Cursor;
use super::layer::Layer;
use super::registry::{LayerId, TypeCode};

const VERBOSE_PREVIEW: usize = 32;
const HEX_LINE: usize = 16;

pub(crate) fn render_unknown(
    ctx: &mut Dissection<'_>,
    layer: LayerId,
    code: TypeCode,
    mut payload: Cursor<'_>,
) -> usize {
    if payload.is_empty() {
        return 0;
    }
    let offset = payload.offset();
    let bytes = payload.rest();
    let summary = format!("unknown {layer} {code:#x}, {} bytes", bytes.len());
    push_data(ctx, offset, summary, bytes);
    bytes.len()
}

pub(crate) fn render_data(ctx: &mut Dissection<'_>, mut payload: Cursor<'_>) -> usize {
    if payload.is_empty() {
        return 0;
    }
    let offset = payload.offset();
    let bytes = payload.rest();
    push_data(ctx, offset, format!("{} bytes", bytes.len()), bytes);
    bytes.len()
}

fn push_data(ctx: &mut Dissection<'_>, offset: usize, summary: String, bytes: &[u8]) {
    let mut layer = Layer::new("data", offset, summary);
    let shown = match ctx.verbosity() {
        Verbosity::Terse => &bytes[..0],
        Verbosity::Verbose => &bytes[..bytes.len().min(VERBOSE_PREVIEW)],
        Verbosity::VeryVerbose => bytes,
    };
    for (index, chunk) in shown.chunks(HEX_LINE).enumerate() {
        layer.detail(format!("0x{:04x}: {}", index * HEX_LINE, hex(chunk)));
    }
    ctx.push_layer(layer);
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
