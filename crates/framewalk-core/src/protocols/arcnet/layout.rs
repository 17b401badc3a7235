pub const LINKTYPE_ARCNET_BSD: u32 = 7;
pub const LINKTYPE_ARCNET_LINUX: u32 = 129;

/// source, destination, type
pub const ARC_HDRLEN: usize = 3;
/// ... plus split flag and sequence id
pub const ARC_HDRNEWLEN: usize = 6;
/// ... plus a repeated type, flag and sequence id after an exception flag
pub const ARC_HDRNEWLEN_EXC: usize = 10;
/// Linux: source, destination, little-endian offset, type
pub const ARC_LINUX_HDRLEN: usize = 5;
pub const ARC_LINUX_HDRNEWLEN: usize = 8;

pub const EXCEPTION_FLAG: u8 = 0xff;

pub const ARCTYPE_IP_OLD: u8 = 0xf0;
pub const ARCTYPE_ARP_OLD: u8 = 0xf1;
pub const ARCTYPE_DIAGNOSE: u8 = 0x80;
/// Legacy IP type value found in some captures alongside 0xf0.
pub const ARCTYPE_IP_OLD_ALT: u8 = 0x08;
pub const ARCTYPE_IP: u8 = 0xd4;
pub const ARCTYPE_ARP: u8 = 0xd5;
pub const ARCTYPE_REVARP: u8 = 0xd6;
pub const ARCTYPE_ATALK: u8 = 0xdd;
pub const ARCTYPE_BANIAN: u8 = 0xf7;
pub const ARCTYPE_IPX: u8 = 0xfa;
pub const ARCTYPE_INET6: u8 = 0xc4;

/// Types that use the 1-byte-type header with no split flag.
pub const LEGACY_TYPES: &[u8] = &[
    ARCTYPE_IP_OLD,
    ARCTYPE_ARP_OLD,
    ARCTYPE_DIAGNOSE,
    ARCTYPE_IP_OLD_ALT,
];

pub const TYPE_NAMES: &[(u8, &str)] = &[
    (ARCTYPE_IP_OLD, "oldip"),
    (ARCTYPE_ARP_OLD, "oldarp"),
    (ARCTYPE_DIAGNOSE, "diag"),
    (ARCTYPE_IP_OLD_ALT, "oldip"),
    (ARCTYPE_IP, "ip"),
    (ARCTYPE_ARP, "arp"),
    (ARCTYPE_REVARP, "rarp"),
    (ARCTYPE_ATALK, "atalk"),
    (ARCTYPE_BANIAN, "banyan"),
    (ARCTYPE_IPX, "ipx"),
    (ARCTYPE_INET6, "ipv6"),
];
