use std::fmt::Write as _;

use crate::engine::{
    Cursor, DissectError, Dissection, LayerRef, LengthMode, TlvHeader, TlvLayout, TlvRecord,
    TlvWalker, Truncated,
};
use crate::names::Names;
use crate::protocols::common::{Prefix, hex, in_record, name_of, read_prefixes};

use super::layout;
use super::parser::afi_safi;

/// Path attribute header: flags, type, then a one-byte length, or a
/// two-byte length when the extended-length flag is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeLayout;

impl TlvLayout for AttributeLayout {
    fn read_header(&self, cursor: &mut Cursor<'_>) -> Result<TlvHeader, Truncated> {
        let mut probe = *cursor;
        let flags = probe.read_u8()?;
        let kind = probe.read_u8()?;
        let length = if flags & layout::ATTR_FLAG_EXTENDED_LENGTH != 0 {
            usize::from(probe.read_u16_be()?)
        } else {
            usize::from(probe.read_u8()?)
        };
        *cursor = probe;
        Ok(TlvHeader {
            type_code: u32::from(kind),
            flags: u32::from(flags),
            declared_length: length,
            length_mode: LengthMode::BodyOnly,
            unit: 1,
        })
    }
}

pub(super) fn dissect_update(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    body: &mut Cursor<'_>,
) -> Result<(), DissectError> {
    let withdrawn_len = usize::from(body.read_u16_be()?);
    let mut withdrawn = body.take(withdrawn_len)?;
    let withdrawn = read_prefixes(&mut withdrawn, 32)?;
    if !withdrawn.is_empty() {
        append_prefixes(ctx, layer, "withdrawn", &withdrawn, Prefix::ipv4);
    }

    let attrs_len = usize::from(body.read_u16_be()?);
    let attrs = body.take(attrs_len)?;
    if withdrawn_len == 0 && attrs_len == 0 && body.is_empty() {
        ctx.layer_mut(layer).summary.push_str(", End-of-Rib Marker");
        return Ok(());
    }

    for attr in TlvWalker::over(attrs, AttributeLayout) {
        let attr = attr?;
        let kind = attr.type_code as u8;
        let name = name_of(layout::ATTR_NAMES, kind);
        let decoded = in_record(&attr, name, decode_attribute(&attr, ctx.names()))?;
        let mut line = format!("{name} ({kind}), length: {}", attr.declared_length);
        let flags = attr.flags as u8;
        if flags != 0 {
            let _ = write!(line, ", Flags [{}]", render_flags(flags));
        }
        let _ = write!(line, ": {}", decoded.text);
        ctx.detail(layer, line);
        if let Some((label, routes)) = decoded.routes {
            let _ = write!(ctx.layer_mut(layer).summary, ", {label} [{}]", routes.join(", "));
        }
    }

    let nlri = read_prefixes(body, 32)?;
    if !nlri.is_empty() {
        append_prefixes(ctx, layer, "nlri", &nlri, Prefix::ipv4);
    }
    Ok(())
}

fn append_prefixes(
    ctx: &mut Dissection<'_>,
    layer: LayerRef,
    label: &str,
    prefixes: &[Prefix],
    render: fn(&Prefix) -> String,
) {
    let rendered: Vec<String> = prefixes.iter().map(render).collect();
    let _ = write!(ctx.layer_mut(layer).summary, ", {label} [{}]", rendered.join(", "));
}

fn render_flags(flags: u8) -> String {
    let mut text = String::new();
    for (bit, letter) in [
        (layout::ATTR_FLAG_OPTIONAL, 'O'),
        (layout::ATTR_FLAG_TRANSITIVE, 'T'),
        (layout::ATTR_FLAG_PARTIAL, 'P'),
        (layout::ATTR_FLAG_EXTENDED_LENGTH, 'E'),
    ] {
        if flags & bit != 0 {
            text.push(letter);
        }
    }
    if flags & 0x0f != 0 {
        let _ = write!(text, "+{:x}", flags & 0x0f);
    }
    text
}

struct Decoded {
    text: String,
    /// Prefixes announced or withdrawn through a multiprotocol attribute.
    routes: Option<(&'static str, Vec<String>)>,
}

impl From<String> for Decoded {
    fn from(text: String) -> Self {
        Self { text, routes: None }
    }
}

const INVALID_LEN: &str = "invalid len";

fn decode_attribute(attr: &TlvRecord<'_>, names: Names<'_>) -> Result<Decoded, DissectError> {
    let mut body = attr.body;
    let len = body.remaining();
    let text = match attr.type_code as u8 {
        layout::ATTR_ORIGIN if len == 1 => {
            name_of(layout::ORIGIN_NAMES, body.read_u8()?).to_string()
        }
        layout::ATTR_AS_PATH | layout::ATTR_AS4_PATH if len % 2 != 0 => INVALID_LEN.to_string(),
        layout::ATTR_AS_PATH | layout::ATTR_AS4_PATH if len == 0 => "empty".to_string(),
        kind @ (layout::ATTR_AS_PATH | layout::ATTR_AS4_PATH) => {
            let as_size = as_size(kind, body.as_slice());
            render_as_path(&mut body, as_size)?
        }
        layout::ATTR_NEXT_HOP | layout::ATTR_ORIGINATOR_ID if len == 4 => {
            let address: [u8; 4] = body.read_array()?;
            names.ipv4(&address).to_string()
        }
        layout::ATTR_MULTI_EXIT_DISC | layout::ATTR_LOCAL_PREF if len == 4 => {
            body.read_u32_be()?.to_string()
        }
        layout::ATTR_ATOMIC_AGGREGATE if len == 0 => String::new(),
        layout::ATTR_AGGREGATOR if len == 6 => {
            let asn = body.read_u16_be()?;
            let address: [u8; 4] = body.read_array()?;
            format!("AS #{asn}, origin {}", names.ipv4(&address))
        }
        layout::ATTR_AGGREGATOR | layout::ATTR_AGGREGATOR4 if len == 8 => {
            let asn = body.read_u32_be()?;
            let address: [u8; 4] = body.read_array()?;
            format!("AS #{asn}, origin {}", names.ipv4(&address))
        }
        layout::ATTR_COMMUNITIES if len % 4 == 0 => {
            let mut communities = Vec::new();
            while !body.is_empty() {
                let community = body.read_u32_be()?;
                let well_known = layout::WELL_KNOWN_COMMUNITIES
                    .iter()
                    .find(|(code, _)| *code == community);
                communities.push(match well_known {
                    Some((_, name)) => name.to_string(),
                    None => format!("{}:{}", community >> 16, community & 0xffff),
                });
            }
            communities.join(", ")
        }
        layout::ATTR_CLUSTER_LIST if len % 4 == 0 => {
            let mut clusters = Vec::new();
            while !body.is_empty() {
                let address: [u8; 4] = body.read_array()?;
                clusters.push(names.ipv4(&address).to_string());
            }
            clusters.join(", ")
        }
        layout::ATTR_EXT_COMMUNITIES if len % 8 == 0 => {
            let mut communities = Vec::new();
            while !body.is_empty() {
                communities.push(format!("0x{}", hex(body.read_bytes(8)?)));
            }
            communities.join(", ")
        }
        layout::ATTR_LARGE_COMMUNITY if len % 12 == 0 => {
            let mut communities = Vec::new();
            while !body.is_empty() {
                let global = body.read_u32_be()?;
                let first = body.read_u32_be()?;
                let second = body.read_u32_be()?;
                communities.push(format!("{global}:{first}:{second}"));
            }
            communities.join(", ")
        }
        layout::ATTR_MP_REACH_NLRI => return decode_mp_reach(&mut body, names),
        layout::ATTR_MP_UNREACH_NLRI => return decode_mp_unreach(&mut body),
        layout::ATTR_ORIGIN
        | layout::ATTR_NEXT_HOP
        | layout::ATTR_ORIGINATOR_ID
        | layout::ATTR_MULTI_EXIT_DISC
        | layout::ATTR_LOCAL_PREF
        | layout::ATTR_ATOMIC_AGGREGATE
        | layout::ATTR_AGGREGATOR
        | layout::ATTR_AGGREGATOR4
        | layout::ATTR_COMMUNITIES
        | layout::ATTR_CLUSTER_LIST
        | layout::ATTR_EXT_COMMUNITIES
        | layout::ATTR_LARGE_COMMUNITY => INVALID_LEN.to_string(),
        _ => format!("no decoder, {}", hex(body.as_slice())),
    };
    Ok(text.into())
}

/// AS paths from old speakers carry 2-byte AS numbers, from new speakers
/// 4-byte ones, under the same attribute type. Assume 2 bytes if the segment
/// structure lines up exactly under that assumption.
fn as_size(kind: u8, path: &[u8]) -> usize {
    if kind == layout::ATTR_AS4_PATH {
        return 4;
    }
    let mut pos = 0;
    while pos < path.len() {
        if !(layout::AS_SET..=layout::AS_CONFED_SET).contains(&path[pos]) {
            return 4;
        }
        let Some(&count) = path.get(pos + 1) else {
            return 4;
        };
        pos += 2 + usize::from(count) * 2;
    }
    if pos == path.len() { 2 } else { 4 }
}

fn render_as_path(body: &mut Cursor<'_>, as_size: usize) -> Result<String, Truncated> {
    let mut text = String::new();
    while !body.is_empty() {
        let segment = body.read_u8()?;
        let count = body.read_u8()?;
        let (open, close) = layout::AS_SEGMENT_DELIMITERS
            .iter()
            .find(|(kind, _)| *kind == segment)
            .map_or(("?", "?"), |(_, delimiters)| *delimiters);
        text.push_str(open);
        for _ in 0..count {
            let asn = if as_size == 2 {
                u32::from(body.read_u16_be()?)
            } else {
                body.read_u32_be()?
            };
            let _ = write!(text, "{asn} ");
        }
        text.push_str(close);
    }
    Ok(text.trim_end().to_string())
}

fn prefix_width(afi: u16, safi: u8) -> Option<(u8, fn(&Prefix) -> String)> {
    if safi != layout::SAFI_UNICAST && safi != layout::SAFI_MULTICAST {
        return None;
    }
    match afi {
        layout::AFI_IPV4 => Some((32, Prefix::ipv4)),
        layout::AFI_IPV6 => Some((128, Prefix::ipv6)),
        _ => None,
    }
}

fn decode_mp_reach(body: &mut Cursor<'_>, names: Names<'_>) -> Result<Decoded, DissectError> {
    let afi = body.read_u16_be()?;
    let safi = body.read_u8()?;
    let nexthop_len = usize::from(body.read_u8()?);
    let nexthop = body.read_bytes(nexthop_len)?;
    body.skip(1)?;
    // An IPv6 next hop may carry a link-local address after the global one.
    let nexthop = match afi {
        layout::AFI_IPV4 => <[u8; 4]>::try_from(nexthop)
            .map_or_else(|_| hex(nexthop), |address| names.ipv4(&address).to_string()),
        layout::AFI_IPV6 => nexthop
            .get(..16)
            .and_then(|global| <[u8; 16]>::try_from(global).ok())
            .map_or_else(|| hex(nexthop), |address| names.ipv6(&address).to_string()),
        _ => hex(nexthop),
    };
    let mut text = format!("{}, nexthop {nexthop}", afi_safi(afi, safi));
    let Some((max_bits, render)) = prefix_width(afi, safi) else {
        text.push_str(", no decoder for NLRI");
        return Ok(text.into());
    };
    let routes: Vec<String> = read_prefixes(body, max_bits)?.iter().map(render).collect();
    let _ = write!(text, ", nlri [{}]", routes.join(", "));
    Ok(Decoded {
        text,
        routes: Some(("mp-reach", routes)),
    })
}

fn decode_mp_unreach(body: &mut Cursor<'_>) -> Result<Decoded, DissectError> {
    let afi = body.read_u16_be()?;
    let safi = body.read_u8()?;
    let mut text = afi_safi(afi, safi);
    let Some((max_bits, render)) = prefix_width(afi, safi) else {
        text.push_str(", no decoder for NLRI");
        return Ok(text.into());
    };
    let routes: Vec<String> = read_prefixes(body, max_bits)?.iter().map(render).collect();
    if routes.is_empty() {
        text.push_str(", End-of-Rib");
        return Ok(text.into());
    }
    let _ = write!(text, ", withdrawn [{}]", routes.join(", "));
    Ok(Decoded {
        text,
        routes: Some(("mp-unreach", routes)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DissectOptions, Verbosity};
    use crate::names::NameCache;
    use crate::engine::{Layer, builtin_registry};
    use crate::protocols::bgp::dissect_bgp;

    fn update(withdrawn: &[u8], attrs: &[u8], nlri: &[u8]) -> Vec<u8> {
        let mut body = (withdrawn.len() as u16).to_be_bytes().to_vec();
        body.extend_from_slice(withdrawn);
        body.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
        body.extend_from_slice(attrs);
        body.extend_from_slice(nlri);
        let mut out = vec![0xff; layout::MARKER_LEN];
        out.extend_from_slice(&((body.len() + layout::HEADER_LEN) as u16).to_be_bytes());
        out.push(layout::MSG_UPDATE);
        out.extend_from_slice(&body);
        out
    }

    fn run(data: &[u8]) -> Vec<Layer> {
        let names = NameCache::default();
        let options = DissectOptions {
            verbosity: Verbosity::Verbose,
            ..DissectOptions::default()
        };
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let consumed = dissect_bgp(Cursor::new(data), &mut ctx).unwrap();
        assert_eq!(consumed, data.len());
        ctx.into_layers()
    }

    #[rustfmt::skip]
    const ATTRS: &[u8] = &[
        0x40, layout::ATTR_ORIGIN, 1, 0,
        0x40, layout::ATTR_AS_PATH, 6, layout::AS_SEQUENCE, 2, 0xfd, 0xe9, 0xfd, 0xea,
        0x40, layout::ATTR_NEXT_HOP, 4, 192, 0, 2, 254,
        // Extended length flag: two-byte length field.
        0xd0, layout::ATTR_COMMUNITIES, 0x00, 0x08, 0xfd, 0xe9, 0x00, 0x64, 0xff, 0xff, 0xff, 0x01,
    ];

    #[test]
    fn update_with_attributes_and_nlri() {
        let data = update(&[16, 10, 9], ATTRS, &[24, 192, 0, 2, 32, 198, 51, 100, 7]);
        let layers = run(&data);
        assert_eq!(
            layers[0].summary,
            format!(
                "BGP UPDATE, length {}, withdrawn [10.9.0.0/16], nlri [192.0.2.0/24, 198.51.100.7/32]",
                data.len()
            )
        );
        assert_eq!(
            layers[0].details,
            vec![
                "Origin (1), length: 1, Flags [T]: IGP",
                "AS Path (2), length: 6, Flags [T]: 65001 65002",
                "Next Hop (3), length: 4, Flags [T]: 192.0.2.254",
                "Community (8), length: 8, Flags [OTE]: 65001:100, NO_EXPORT",
            ]
        );
        assert!(layers[0].marker.is_none());
    }

    #[test]
    fn four_byte_as_path_detected() {
        let path = [layout::AS_SEQUENCE, 1, 0x00, 0x01, 0x00, 0x00];
        assert_eq!(as_size(layout::ATTR_AS_PATH, &path), 4);
        let two_byte = [layout::AS_SET, 2, 0x00, 0x01, 0x00, 0x02];
        assert_eq!(as_size(layout::ATTR_AS_PATH, &two_byte), 2);
        let mut body = Cursor::new(&two_byte);
        assert_eq!(render_as_path(&mut body, 2).unwrap(), "{ 1 2 }");
    }

    #[test]
    fn end_of_rib_marker() {
        let data = update(&[], &[], &[]);
        let layers = run(&data);
        assert_eq!(layers[0].summary, "BGP UPDATE, length 23, End-of-Rib Marker");
    }

    #[test]
    fn mp_reach_ipv6() {
        let mut attr = vec![0x80, layout::ATTR_MP_REACH_NLRI, 0];
        let mut value = vec![0x00, 0x02, layout::SAFI_UNICAST, 16];
        let mut nexthop = [0u8; 16];
        nexthop[..2].copy_from_slice(&[0x20, 0x01]);
        nexthop[15] = 1;
        value.extend_from_slice(&nexthop);
        value.push(0);
        value.extend_from_slice(&[32, 0x20, 0x01, 0x0d, 0xb8]);
        attr[2] = value.len() as u8;
        attr.extend_from_slice(&value);
        let data = update(&[], &attr, &[]);
        let layers = run(&data);
        assert!(layers[0].summary.ends_with(", mp-reach [2001:db8::/32]"));
        assert_eq!(
            layers[0].details[0],
            "Multi-Protocol Reach NLRI (14), length: 26, Flags [O]: \
             AFI IPv6 (2), SAFI Unicast (1), nexthop 2001::1, nlri [2001:db8::/32]"
        );
    }

    #[test]
    fn attribute_overrunning_path_attributes_is_marked() {
        // Origin claims 3 bytes, 1 left in the attribute block.
        let attrs = [0x40, layout::ATTR_ORIGIN, 3, 0];
        let data = update(&[], &attrs, &[]);
        let layers = run(&data);
        assert!(layers[0].marker.as_deref().unwrap().starts_with("[bgp: invalid, length 6 exceeds"));
    }

    #[test]
    fn wrong_fixed_length_is_reported_not_fatal() {
        let attrs = [0x40, layout::ATTR_NEXT_HOP, 2, 10, 0];
        let data = update(&[], &attrs, &[]);
        let layers = run(&data);
        assert_eq!(layers[0].details[0], "Next Hop (3), length: 2, Flags [T]: invalid len");
        assert!(layers[0].marker.is_none());
    }
}
