use crate::engine::{FieldWidth, FixedTlv, LengthMode};

pub const IP_PROTO_EIGRP: u8 = 88;

pub const VERSION: u8 = 2;
/// Version, opcode, checksum, flags, sequence, acknowledgement, AS number.
pub const HEADER_LEN: usize = 20;

/// 16-bit type and 16-bit length counting the four header bytes.
pub const TLV: FixedTlv =
    FixedTlv::new(FieldWidth::U16, FieldWidth::U16, LengthMode::IncludesHeader).with_min_len(4);

pub const OPCODE_NAMES: &[(u8, &str)] = &[
    (1, "Update"),
    (3, "Query"),
    (4, "Reply"),
    (5, "Hello"),
    (6, "IPX SAP"),
    (10, "SIA Query"),
    (11, "SIA Reply"),
];

pub const FLAG_NAMES: &[(u32, &str)] = &[
    (0x01, "Init"),
    (0x02, "Conditionally Received"),
    (0x04, "Restart"),
    (0x08, "End-of-Table"),
];

pub const TLV_GENERAL_PARAMETERS: u16 = 0x0001;
pub const TLV_AUTHENTICATION: u16 = 0x0002;
pub const TLV_SEQUENCE: u16 = 0x0003;
pub const TLV_SOFTWARE_VERSION: u16 = 0x0004;
pub const TLV_NEXT_MULTICAST_SEQUENCE: u16 = 0x0005;
pub const TLV_IPV4_INTERNAL: u16 = 0x0102;
pub const TLV_IPV4_EXTERNAL: u16 = 0x0103;

pub const TLV_NAMES: &[(u16, &str)] = &[
    (TLV_GENERAL_PARAMETERS, "General Parameters"),
    (TLV_AUTHENTICATION, "Authentication"),
    (TLV_SEQUENCE, "Sequence"),
    (TLV_SOFTWARE_VERSION, "Software Version"),
    (TLV_NEXT_MULTICAST_SEQUENCE, "Next Multicast Sequence"),
    (TLV_IPV4_INTERNAL, "IPv4 Internal routes"),
    (TLV_IPV4_EXTERNAL, "IPv4 External routes"),
];

/// Smallest body for each decoded TLV type, header excluded.
pub const GENERAL_PARAMETERS_LEN: usize = 8;
pub const SOFTWARE_VERSION_LEN: usize = 4;
/// Next hop, metric block and prefix length; prefix bytes follow.
pub const IPV4_INTERNAL_LEN: usize = 21;
/// Adds origin router, origin AS, tag, external metric, protocol and flags.
pub const IPV4_EXTERNAL_LEN: usize = 41;

pub const EXTERNAL_PROTOCOL_NAMES: &[(u8, &str)] = &[
    (1, "IGRP"),
    (2, "EIGRP"),
    (3, "Static"),
    (4, "RIP"),
    (5, "Hello"),
    (6, "OSPF"),
    (7, "IS-IS"),
    (8, "EGP"),
    (9, "BGP"),
    (10, "IDRP"),
    (11, "Connected"),
];

/// Scaled bandwidth is 256 * 10^7 divided by the bandwidth in kbit/s.
pub const BANDWIDTH_SCALE: u64 = 2_560_000_000;
