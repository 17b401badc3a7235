pub const SAP_SNAP: u8 = 0xaa;

/// Individual/Group bit of the DSAP.
pub const IG_BIT: u8 = 0x01;
/// Command/Response bit of the SSAP.
pub const CR_BIT: u8 = 0x01;

pub const U_FORMAT_MASK: u8 = 0x03;
pub const U_FORMAT: u8 = 0x03;
pub const S_FORMAT_MASK: u8 = 0x01;
pub const POLL_FINAL_BIT: u8 = 0x10;

pub const U_UI: u8 = 0x03;

pub const U_HEADER_LEN: usize = 3;
pub const IS_HEADER_LEN: usize = 4;
pub const SNAP_HEADER_LEN: usize = 5;

/// OUIs whose PID field is an Ethertype.
pub const OUI_ENCAP_ETHER: u32 = 0x000000;
pub const OUI_CISCO_90: u32 = 0x0000f8;

pub const U_COMMANDS: &[(u8, &str)] = &[
    (0x03, "UI"),
    (0x0f, "DM"),
    (0x43, "DISC"),
    (0x63, "UA"),
    (0x6f, "SABME"),
    (0x87, "FRMR"),
    (0xaf, "XID"),
    (0xe3, "TEST"),
];

pub const S_COMMANDS: &[(u8, &str)] = &[(0, "RR"), (1, "RNR"), (2, "REJ")];
