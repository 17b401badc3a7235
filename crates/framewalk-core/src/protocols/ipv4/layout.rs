pub const ETHERTYPE_IPV4: u16 = 0x0800;
/// IP-in-IP.
pub const IPPROTO_IPIP: u8 = 4;

pub const VERSION: u8 = 4;
pub const MIN_HEADER_LEN: usize = 20;

pub const FLAG_RESERVED: u16 = 0x8000;
pub const FLAG_DF: u16 = 0x4000;
pub const FLAG_MF: u16 = 0x2000;
pub const FRAGMENT_OFFSET_MASK: u16 = 0x1fff;

pub const OPT_EOL: u8 = 0;
pub const OPT_NOP: u8 = 1;

pub const OPTION_NAMES: &[(u8, &str)] = &[
    (OPT_EOL, "EOL"),
    (OPT_NOP, "NOP"),
    (7, "RR"),
    (68, "TS"),
    (130, "SECURITY"),
    (131, "LSRR"),
    (136, "SATID"),
    (137, "SSRR"),
    (148, "RA"),
];
