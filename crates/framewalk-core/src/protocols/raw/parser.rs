use crate::engine::{Cursor, DissectError, Dissection, LayerId};

use super::layout;

/// Raw IP: no link header, the version nibble picks the network layer.
pub fn dissect_raw(payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    let version = payload.peek_u8()? >> 4;
    let ethertype = match version {
        4 => layout::ETHERTYPE_IPV4,
        6 => layout::ETHERTYPE_IPV6,
        other => {
            return Err(DissectError::corrupt(
                payload.offset(),
                format!("unknown IP version {other}"),
            ));
        }
    };
    ctx.dispatch(LayerId::Ethertype, u64::from(ethertype), payload)
}

pub fn dissect_raw_ipv4(payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    ctx.dispatch(LayerId::Ethertype, u64::from(layout::ETHERTYPE_IPV4), payload)
}

pub fn dissect_raw_ipv6(payload: Cursor<'_>, ctx: &mut Dissection<'_>) -> Result<usize, DissectError> {
    ctx.dispatch(LayerId::Ethertype, u64::from(layout::ETHERTYPE_IPV6), payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DissectOptions;
    use crate::engine::{Outcome, builtin_registry};
    use crate::names::NameCache;

    #[test]
    fn unknown_version_is_corrupt() {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let err = dissect_raw(Cursor::new(&[0x75, 0x00]), &mut ctx).unwrap_err();
        assert_eq!(err.outcome(), Outcome::Corrupt);
        assert!(ctx.layers().is_empty());
    }

    #[test]
    fn empty_capture_is_truncated() {
        let names = NameCache::default();
        let options = DissectOptions::default();
        let mut ctx = Dissection::new(builtin_registry(), &names, &options);
        let err = dissect_raw(Cursor::new(&[]), &mut ctx).unwrap_err();
        assert_eq!(err.outcome(), Outcome::Truncated);
    }
}
