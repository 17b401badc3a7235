use std::fs;
use std::path::Path;

use tempfile::TempDir;

use framewalk_core::config::DissectOptions;
use framewalk_core::engine::Outcome;
use framewalk_core::names::NameCache;
use framewalk_core::{PacketSource, PcapFileSource, SourceError, dissect_pcap_file};

fn legacy_pcap(records: &[(&[u8], u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&4u16.to_le_bytes());
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&65535u32.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    for (index, (data, wire_len)) in records.iter().enumerate() {
        out.extend_from_slice(&(index as u32 + 1).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&wire_len.to_le_bytes());
        out.extend_from_slice(data);
    }
    out
}

fn block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total = (12 + body.len()) as u32;
    let mut out = block_type.to_le_bytes().to_vec();
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(&total.to_le_bytes());
    out
}

fn pcapng(linktype: u16, packet: &[u8]) -> Vec<u8> {
    let mut shb = 0x1a2b_3c4du32.to_le_bytes().to_vec();
    shb.extend_from_slice(&1u16.to_le_bytes());
    shb.extend_from_slice(&0u16.to_le_bytes());
    shb.extend_from_slice(&(-1i64).to_le_bytes());

    let mut idb = linktype.to_le_bytes().to_vec();
    idb.extend_from_slice(&0u16.to_le_bytes());
    idb.extend_from_slice(&65535u32.to_le_bytes());

    let mut epb = 0u32.to_le_bytes().to_vec();
    epb.extend_from_slice(&0u32.to_le_bytes());
    epb.extend_from_slice(&2_000_000u32.to_le_bytes());
    epb.extend_from_slice(&(packet.len() as u32).to_le_bytes());
    epb.extend_from_slice(&(packet.len() as u32).to_le_bytes());
    epb.extend_from_slice(packet);
    epb.resize(epb.len().div_ceil(4) * 4, 0);

    let mut out = block(0x0a0d_0d0a, &shb);
    out.extend(block(1, &idb));
    out.extend(block(6, &epb));
    out
}

fn ethernet(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0xff; 6];
    frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 1]);
    frame.extend_from_slice(&ethertype.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn drain(path: &Path) -> Vec<framewalk_core::PacketEvent> {
    let mut source = PcapFileSource::open(path).unwrap();
    let mut events = Vec::new();
    while let Some(event) = source.next_packet().unwrap() {
        events.push(event);
    }
    events
}

#[test]
fn legacy_pcap_yields_every_record() {
    let dir = TempDir::new().unwrap();
    let frame = ethernet(0x9000, &[1, 2, 3, 4]);
    let path = write(&dir, "two.pcap", &legacy_pcap(&[(frame.as_slice(), 18), (&frame[..10], 60)]));

    let events = drain(&path);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].ts, Some(1.0));
    assert_eq!(events[0].data, frame);
    assert_eq!(events[1].data.len(), 10);
    assert_eq!(events[1].wire_len, 60);
    assert!(events[1].frame().is_short());
}

#[test]
fn pcapng_carries_interface_link_type() {
    let dir = TempDir::new().unwrap();
    let frame = ethernet(0x9000, &[1, 2, 3]);
    let path = write(&dir, "one.pcapng", &pcapng(1, &frame));

    let events = drain(&path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].linktype.0, 1);
    assert_eq!(events[0].data, frame);
    let ts = events[0].ts.unwrap();
    assert!((ts - 2.0).abs() < 1e-9);
}

#[test]
fn dissect_pcap_file_builds_report() {
    let dir = TempDir::new().unwrap();
    let frame = ethernet(0x9000, &[1, 2, 3, 4]);
    let path = write(&dir, "report.pcap", &legacy_pcap(&[(frame.as_slice(), 18), (&frame[..4], 18)]));

    let names = NameCache::default();
    let report = dissect_pcap_file(&path, DissectOptions::default(), &names).unwrap();
    assert_eq!(report.summary.frames_total, 2);
    assert_eq!(report.frames[0].outcome, Outcome::Decoded);
    assert_eq!(report.frames[1].outcome, Outcome::Truncated);
    assert_eq!(report.frames[1].marker.as_deref(), Some("[|ether]"));
    assert_eq!(report.input.bytes, fs::metadata(&path).unwrap().len());
}

#[test]
fn pcap_source_rejects_truncated_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "cut.pcapng", &[0x0a, 0x0d, 0x0d]);

    let err = match PcapFileSource::open(&path) {
        Ok(_) => panic!("expected truncated file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}
