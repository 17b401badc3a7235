pub const LINKTYPE_LINUX_SLL: u32 = 113;

pub const HEADER_LEN: usize = 16;
pub const ADDRESS_FIELD_LEN: usize = 8;

pub const ARPHRD_ETHER: u16 = 1;

/// Protocol values that are not Ethertypes.
pub const PROTO_8023_RAW: u16 = 0x0001;
pub const PROTO_8022: u16 = 0x0004;

pub const PACKET_TYPES: &[(u16, &str)] = &[
    (0, "In"),
    (1, "B"),
    (2, "M"),
    (3, "P"),
    (4, "Out"),
];
