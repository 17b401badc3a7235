pub const LINKTYPE_ETHERNET: u32 = 1;

pub const HEADER_LEN: usize = 14;
/// Type/length values up to this are 802.3 lengths, not Ethertypes.
pub const MAX_8023_LENGTH: u16 = 1500;

pub const ETHERTYPE_8021Q: u16 = 0x8100;
pub const ETHERTYPE_8021AD: u16 = 0x88a8;
pub const ETHERTYPE_QINQ_LEGACY: u16 = 0x9100;

pub const VLAN_TAG_LEN: usize = 4;
pub const VLAN_ID_MASK: u16 = 0x0fff;
pub const VLAN_DEI_BIT: u16 = 0x1000;
pub const VLAN_PCP_SHIFT: u16 = 13;
