pub const IPPROTO_TCP: u8 = 6;

pub const MIN_HEADER_LEN: usize = 20;

pub const FLAGS: &[(u16, &str)] = &[
    (0x001, "F"),
    (0x002, "S"),
    (0x004, "R"),
    (0x008, "P"),
    (0x010, "."),
    (0x020, "U"),
    (0x040, "E"),
    (0x080, "W"),
    (0x100, "e"),
];
pub const FLAG_ACK: u16 = 0x010;

pub const OPT_EOL: u8 = 0;
pub const OPT_NOP: u8 = 1;
pub const OPT_MSS: u8 = 2;
pub const OPT_WSCALE: u8 = 3;
pub const OPT_SACK_OK: u8 = 4;
pub const OPT_SACK: u8 = 5;
pub const OPT_TIMESTAMP: u8 = 8;
