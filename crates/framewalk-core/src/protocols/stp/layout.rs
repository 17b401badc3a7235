pub const SAP_STP: u8 = 0x42;
pub const OUI_IEEE_8021: u32 = 0x0080c2;
/// PID carrying bridged BPDUs over SNAP.
pub const PID_BPDU: u16 = 0x000e;

pub const PROTO_ID: u16 = 0x0000;

pub const VERSION_STP: u8 = 0;
pub const VERSION_RSTP: u8 = 2;
pub const VERSION_MSTP: u8 = 3;

pub const BPDU_CONFIG: u8 = 0x00;
pub const BPDU_RSTP: u8 = 0x02;
pub const BPDU_TCN: u8 = 0x80;

pub const TCN_LEN: usize = 4;
pub const CONFIG_LEN: usize = 35;
pub const RSTP_LEN: usize = 36;
/// Fixed MST fields counted by the v3 length, before the MSTI records.
pub const MST_FIXED_LEN: usize = 64;
pub const MSTI_LEN: usize = 16;

pub const MST_CONFIG_NAME_LEN: usize = 32;
pub const MST_DIGEST_LEN: usize = 16;

pub const VERSION_NAMES: &[(u8, &str)] = &[
    (VERSION_STP, "802.1d"),
    (VERSION_RSTP, "802.1w"),
    (VERSION_MSTP, "802.1s"),
];

pub const FLAG_TOPOLOGY_CHANGE: u8 = 0x01;
pub const FLAG_PROPOSAL: u8 = 0x02;
pub const FLAG_LEARN: u8 = 0x10;
pub const FLAG_FORWARD: u8 = 0x20;
pub const FLAG_AGREEMENT: u8 = 0x40;
pub const FLAG_TC_ACK: u8 = 0x80;
pub const PORT_ROLE_MASK: u8 = 0x0c;
pub const PORT_ROLE_SHIFT: u8 = 2;

pub const FLAGS: &[(u8, &str)] = &[
    (FLAG_TOPOLOGY_CHANGE, "Topology change"),
    (FLAG_PROPOSAL, "Proposal"),
    (FLAG_LEARN, "Learn"),
    (FLAG_FORWARD, "Forward"),
    (FLAG_AGREEMENT, "Agreement"),
    (FLAG_TC_ACK, "Topology change ACK"),
];

pub const PORT_ROLES: &[(u8, &str)] = &[
    (0, "Unknown"),
    (1, "Alternate"),
    (2, "Root"),
    (3, "Designated"),
];
