pub const ETHERTYPE_IPV6: u16 = 0x86dd;
pub const IPPROTO_IPV6: u8 = 41;

pub const VERSION: u8 = 6;
pub const HEADER_LEN: usize = 40;

pub const NH_HOP_BY_HOP: u8 = 0;
pub const NH_ROUTING: u8 = 43;
pub const NH_FRAGMENT: u8 = 44;
pub const NH_NONE: u8 = 59;
pub const NH_DEST_OPTS: u8 = 60;

/// Extension header lengths count 8-octet units beyond the first.
pub const EXT_UNIT: usize = 8;
pub const FRAGMENT_HEADER_LEN: usize = 8;
pub const FRAGMENT_OFFSET_MASK: u16 = 0xfff8;
pub const FRAGMENT_MORE: u16 = 0x0001;

pub const OPT_PAD1: u8 = 0;
pub const OPT_PADN: u8 = 1;

pub const OPTION_NAMES: &[(u8, &str)] = &[
    (OPT_PAD1, "Pad1"),
    (OPT_PADN, "PadN"),
    (0x04, "tunnel-limit"),
    (0x05, "router-alert"),
    (0xc2, "jumbo"),
    (0xc9, "home-address"),
];
