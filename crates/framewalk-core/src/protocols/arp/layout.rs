pub const ETHERTYPE_ARP: u16 = 0x0806;
pub const ETHERTYPE_REVARP: u16 = 0x8035;

/// Fixed part: hardware type, protocol type, address lengths, opcode.
pub const FIXED_LEN: usize = 8;

pub const HRD_ETHER: u16 = 1;
pub const HRD_IEEE802: u16 = 6;
pub const HRD_ARCNET: u16 = 7;

pub const PRO_IPV4: u16 = 0x0800;

pub const OP_REQUEST: u16 = 1;
pub const OP_REPLY: u16 = 2;
pub const OP_REVREQUEST: u16 = 3;
pub const OP_REVREPLY: u16 = 4;
pub const OP_INVREQUEST: u16 = 8;
pub const OP_INVREPLY: u16 = 9;
