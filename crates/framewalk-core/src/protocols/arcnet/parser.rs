use std::fmt::Write as _;

use crate::engine::{Cursor, DissectError, Dissection, Layer, LayerId, LinkAddress};
use crate::protocols::common::name_of;

use super::layout;

/// Split-flag state of a new-style header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Whole,
    /// First of `count` fragments.
    First { count: u16 },
    /// Any later fragment; carries no upper-layer header.
    Later { number: u16 },
}

impl Fragment {
    pub fn from_flag(flag: u8) -> Self {
        let flag = u16::from(flag);
        if flag == 0 {
            Fragment::Whole
        } else if flag % 2 == 1 {
            Fragment::First {
                count: (flag + 3) / 2,
            }
        } else {
            Fragment::Later {
                number: flag / 2 + 1,
            }
        }
    }
}

pub fn is_legacy_type(arc_type: u8) -> bool {
    layout::LEGACY_TYPES.contains(&arc_type)
}

/// BSD-style ARCNET header (`LINKTYPE_ARCNET_BSD`).
pub fn dissect_arcnet(mut payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let src = payload.read_u8()?;
    let dst = payload.read_u8()?;
    let mut arc_type = payload.read_u8()?;
    if is_legacy_type(arc_type) {
        return finish(ctx, offset, layout::ARC_HDRLEN, (src, dst, arc_type), None, payload);
    }

    let mut flag = payload.read_u8()?;
    let mut seqid = payload.read_u16_be()?;
    let mut header_len = layout::ARC_HDRNEWLEN;
    if flag == layout::EXCEPTION_FLAG {
        arc_type = payload.read_u8()?;
        flag = payload.read_u8()?;
        seqid = payload.read_u16_be()?;
        header_len = layout::ARC_HDRNEWLEN_EXC;
    }
    finish(ctx, offset, header_len, (src, dst, arc_type), Some((flag, seqid)), payload)
}

/// Linux ARCNET header (`LINKTYPE_ARCNET_LINUX`), which carries a
/// little-endian buffer offset between the addresses and the type.
pub fn dissect_arcnet_linux(
    mut payload: Cursor<'_>,
    ctx: &mut Dissection<'_>,
) -> Result<usize, DissectError> {
    let offset = payload.offset();
    let src = payload.read_u8()?;
    let dst = payload.read_u8()?;
    let _buffer_offset = payload.read_u16_le()?;
    let arc_type = payload.read_u8()?;
    if is_legacy_type(arc_type) {
        return finish(ctx, offset, layout::ARC_LINUX_HDRLEN, (src, dst, arc_type), None, payload);
    }

    let flag = payload.read_u8()?;
    let seqid = payload.read_u16_be()?;
    finish(
        ctx,
        offset,
        layout::ARC_LINUX_HDRNEWLEN,
        (src, dst, arc_type),
        Some((flag, seqid)),
        payload,
    )
}

fn finish(
    ctx: &mut Dissection<'_>,
    offset: usize,
    header_len: usize,
    (src, dst, arc_type): (u8, u8, u8),
    split: Option<(u8, u16)>,
    payload: Cursor<'_>,
) -> Result<usize, DissectError> {
    ctx.addressing.link_src = Some(LinkAddress::Arcnet(src));
    ctx.addressing.link_dst = Some(LinkAddress::Arcnet(dst));

    let mut summary = format!(
        "arcnet {src:02x} > {dst:02x}, {} (0x{arc_type:02x})",
        name_of(layout::TYPE_NAMES, arc_type)
    );
    let fragment = split.map_or(Fragment::Whole, |(flag, _)| Fragment::from_flag(flag));
    if let Some((flag, seqid)) = split {
        match fragment {
            Fragment::Whole => {}
            Fragment::First { count } => {
                let _ = write!(summary, ", first of {count} fragments, seqid 0x{seqid:04x}");
            }
            Fragment::Later { number } => {
                let _ = write!(summary, ", fragment {number}, seqid 0x{seqid:04x}");
            }
        }
        if ctx.verbose() {
            let _ = write!(summary, ", flag 0x{flag:02x}");
        }
    }
    ctx.push_layer(Layer::new("arcnet", offset, summary));

    let inner = match fragment {
        Fragment::Later { .. } => ctx.raw_payload(payload),
        _ => ctx.dispatch(LayerId::ArcnetType, u64::from(arc_type), payload)?,
    };
    Ok(header_len + inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_flag_decoding() {
        assert_eq!(Fragment::from_flag(0), Fragment::Whole);
        assert_eq!(Fragment::from_flag(1), Fragment::First { count: 2 });
        assert_eq!(Fragment::from_flag(3), Fragment::First { count: 3 });
        assert_eq!(Fragment::from_flag(2), Fragment::Later { number: 2 });
        assert_eq!(Fragment::from_flag(254), Fragment::Later { number: 128 });
    }

    #[test]
    fn legacy_types() {
        assert!(is_legacy_type(layout::ARCTYPE_IP_OLD));
        assert!(is_legacy_type(layout::ARCTYPE_IP_OLD_ALT));
        assert!(!is_legacy_type(layout::ARCTYPE_IP));
    }
}
