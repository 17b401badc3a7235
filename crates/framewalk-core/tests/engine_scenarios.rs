use std::sync::Arc;

use etherparse::PacketBuilder;
use proptest::prelude::*;

use framewalk_core::config::{DissectOptions, Verbosity};
use framewalk_core::engine::{
    Cursor, Dissection, FieldWidth, FixedTlv, FrameView, LengthMode, Outcome, TlvError,
    TlvWalker, builtin_registry,
};
use framewalk_core::names::{AddressFamily, NameCache};
use framewalk_core::pipeline::{FrameDissection, FramePipeline};

const LINKTYPE_ETHERNET: u32 = 1;
const LINKTYPE_ARCNET_BSD: u32 = 7;

const TLV_8_8: FixedTlv = FixedTlv::new(FieldWidth::U8, FieldWidth::U8, LengthMode::IncludesHeader);

fn dissect(data: &[u8], wire_len: usize, linktype: u32) -> FrameDissection {
    let names = NameCache::default();
    let pipeline = FramePipeline::builtin(&names, DissectOptions::default());
    pipeline.dissect(&FrameView::new(data, wire_len), linktype, 1, None)
}

fn protocols(frame: &FrameDissection) -> Vec<&'static str> {
    frame.layers.iter().map(|layer| layer.protocol).collect()
}

#[test]
fn two_byte_capture_is_truncated_before_any_layer() {
    let frame = dissect(&[0x00, 0x11], 60, LINKTYPE_ETHERNET);
    assert_eq!(frame.outcome, Outcome::Truncated);
    assert!(frame.layers.is_empty());
    assert_eq!(frame.marker.as_deref(), Some("[|ether]"));
}

#[test]
fn arcnet_legacy_ip_type_dispatches_after_three_bytes() {
    let builder = PacketBuilder::ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64).udp(4000, 4001);
    let payload = [0xde, 0xad];
    let mut data = vec![0x01, 0x02, 0x08];
    builder.write(&mut data, &payload).unwrap();

    let frame = dissect(&data, data.len(), LINKTYPE_ARCNET_BSD);
    assert_eq!(frame.outcome, Outcome::Decoded);
    assert_eq!(protocols(&frame), vec!["arcnet", "ip", "udp", "data"]);
    assert_eq!(frame.layers[1].offset, 3);
    assert_eq!(frame.consumed, data.len());
}

#[test]
fn header_only_record_has_empty_body() {
    let data = [0x01, 0x02];
    let mut walker = TlvWalker::over(Cursor::new(&data), TLV_8_8);
    let record = walker.next().unwrap().unwrap();
    assert_eq!(record.type_code, 1);
    assert_eq!(record.body_len(), 0);
    assert!(walker.next().is_none());
}

#[test]
fn overlong_second_record_is_corrupt_at_its_header() {
    let data = [0x01, 0x03, 0xaa, 0x02, 0x09, 0xbb, 0xcc];
    let (records, result) = TlvWalker::over(Cursor::new(&data), TLV_8_8).into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].body.as_slice(), &[0xaa]);
    match result {
        Err(TlvError::Corrupt {
            type_code, offset, ..
        }) => {
            assert_eq!(type_code, Some(2));
            assert_eq!(offset, 3);
        }
        other => panic!("expected corrupt record, got {other:?}"),
    }
}

#[test]
fn broadcast_name_is_cached() {
    let names = NameCache::default();
    let first = names.lookup_or_insert(AddressFamily::Ethernet, &[0xff; 6]);
    let second = names.lookup_or_insert(AddressFamily::Ethernet, &[0xff; 6]);
    assert_eq!(&*first, "Broadcast");
    assert!(Arc::ptr_eq(&first, &second));
    let stats = names.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn snap_zero_oui_goes_through_ethertype_space() {
    let mut data = vec![0x01, 0x80, 0xc2, 0x00, 0x00, 0x00];
    data.extend_from_slice(&[0x02, 0, 0, 0, 0, 1]);
    // 802.3 length: LLC + SNAP + ARP.
    data.extend_from_slice(&(8u16 + 28).to_be_bytes());
    data.extend_from_slice(&[0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x08, 0x06]);
    data.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
    data.extend_from_slice(&[0x02, 0, 0, 0, 0, 1, 192, 0, 2, 1]);
    data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 192, 0, 2, 2]);

    let frame = dissect(&data, data.len(), LINKTYPE_ETHERNET);
    assert_eq!(frame.outcome, Outcome::Decoded);
    assert_eq!(protocols(&frame), vec!["ether", "llc", "arp"]);
    assert_eq!(frame.layers[2].offset, 22);
}

#[test]
fn tcp_to_bgp_port_reaches_bgp() {
    let builder = PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
        .ipv4([192, 0, 2, 1], [192, 0, 2, 2], 64)
        .tcp(50000, 179, 1, 65535);
    let mut keepalive = vec![0xff; 16];
    keepalive.extend_from_slice(&[0x00, 0x13, 0x04]);
    let mut data = Vec::new();
    builder.write(&mut data, &keepalive).unwrap();

    let frame = dissect(&data, data.len(), LINKTYPE_ETHERNET);
    assert_eq!(frame.outcome, Outcome::Decoded);
    assert_eq!(protocols(&frame), vec!["ether", "ip", "tcp", "bgp"]);
    assert_eq!(frame.layers[3].summary, "BGP KEEPALIVE, length 19");
}

#[test]
fn udp_to_radius_port_reaches_radius() {
    let builder = PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
        .ipv4([192, 0, 2, 1], [192, 0, 2, 2], 64)
        .udp(40000, 1812);
    let mut radius = vec![1, 7, 0x00, 0x19];
    radius.extend_from_slice(&[0; 16]);
    radius.extend_from_slice(&[1, 5, b'a', b'm', b'y']);
    let mut data = Vec::new();
    builder.write(&mut data, &radius).unwrap();

    let frame = dissect(&data, data.len(), LINKTYPE_ETHERNET);
    assert_eq!(frame.outcome, Outcome::Decoded);
    assert_eq!(protocols(&frame), vec!["ether", "ip", "udp", "radius"]);
    assert_eq!(
        frame.layers[3].summary,
        "RADIUS, Access-Request (1), id: 0x07 length: 25"
    );
}

#[test]
fn radius_length_past_udp_payload_is_corrupt_without_overcounting() {
    let builder = PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
        .ipv4([192, 0, 2, 1], [192, 0, 2, 2], 64)
        .udp(40000, 1812);
    let mut radius = vec![1, 7, 0x00, 0x40];
    radius.extend_from_slice(&[0; 16]);
    radius.extend_from_slice(&[1, 3, b'x']);
    let mut data = Vec::new();
    builder.write(&mut data, &radius).unwrap();

    let frame = dissect(&data, data.len(), LINKTYPE_ETHERNET);
    assert_eq!(frame.outcome, Outcome::Decoded);
    assert!(frame.consumed <= data.len());
    assert_eq!(
        frame.layers[3].marker.as_deref(),
        Some("[radius: invalid, length 64 exceeds 23 bytes of payload]")
    );
}

#[test]
fn foreign_snap_oui_is_not_decoded_as_bpdu() {
    let mut data = vec![0x01, 0x80, 0xc2, 0x00, 0x00, 0x00];
    data.extend_from_slice(&[0x02, 0, 0, 0, 0, 1]);
    data.extend_from_slice(&(8u16 + 35).to_be_bytes());
    data.extend_from_slice(&[0xaa, 0xaa, 0x03, 0xab, 0x80, 0xc2, 0x00, 0x0e]);
    data.extend_from_slice(&[0; 35]);

    let frame = dissect(&data, data.len(), LINKTYPE_ETHERNET);
    assert_eq!(protocols(&frame), vec!["ether", "llc", "data"]);
    assert!(!frame.render_text().contains("oui oui"));
}

#[test]
fn unregistered_ethertype_is_raw_not_corrupt() {
    let mut data = vec![0xff; 6];
    data.extend_from_slice(&[0x02, 0, 0, 0, 0, 1, 0x88, 0xb5, 1, 2, 3]);
    let frame = dissect(&data, data.len(), LINKTYPE_ETHERNET);
    assert_eq!(frame.outcome, Outcome::Decoded);
    assert_eq!(protocols(&frame), vec!["ether", "data"]);
}

proptest! {
    #[test]
    fn cursor_reads_stay_in_bounds(
        data in proptest::collection::vec(any::<u8>(), 0..64),
        reads in proptest::collection::vec(0usize..9, 0..32),
    ) {
        let mut cursor = Cursor::new(&data);
        for width in reads {
            let before = cursor.position();
            match cursor.read_bytes(width) {
                Ok(bytes) => prop_assert_eq!(bytes.len(), width),
                Err(truncated) => {
                    prop_assert_eq!(cursor.position(), before);
                    prop_assert!(truncated.available < width);
                }
            }
            prop_assert!(cursor.position() <= data.len());
        }
    }

    #[test]
    fn walker_finishes_within_sequence_length(
        data in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let steps = TlvWalker::over(Cursor::new(&data), TLV_8_8).count();
        prop_assert!(steps <= data.len() + 1);
    }

    #[test]
    fn every_registered_dissector_stays_within_its_payload(
        data in proptest::collection::vec(any::<u8>(), 0..160),
        verbose in any::<bool>(),
    ) {
        let names = NameCache::default();
        let options = DissectOptions {
            verbosity: Verbosity::from_level(u8::from(verbose) * 2),
            ..DissectOptions::default()
        };
        for entry in builtin_registry().entries() {
            let mut ctx = Dissection::new(builtin_registry(), &names, &options);
            if let Ok(consumed) = ctx.call(entry.name, entry.handler, Cursor::new(&data)) {
                prop_assert!(
                    consumed <= data.len(),
                    "{} ({} {:#x}) consumed {} of {}",
                    entry.name,
                    entry.layer,
                    entry.code,
                    consumed,
                    data.len()
                );
            }
        }
    }

    #[test]
    fn arbitrary_ethernet_frames_never_overrun(
        data in proptest::collection::vec(any::<u8>(), 0..128),
        extra in 0usize..64,
    ) {
        let frame = dissect(&data, data.len() + extra, LINKTYPE_ETHERNET);
        prop_assert!(frame.consumed <= data.len());
        if extra > 0 {
            prop_assert_ne!(frame.outcome, Outcome::Decoded);
        }
    }
}
