use crate::engine::{FieldWidth, FixedTlv, LengthMode, Terminator};

pub const ETHERTYPE_SLOW: u16 = 0x8809;

pub const SUBTYPE_LACP: u8 = 1;
pub const SUBTYPE_MARKER: u8 = 2;
pub const SUBTYPE_OAM: u8 = 3;

/// LACP, Marker and OAM information records: 8-bit type and length, the
/// length counting the header, ended by an all-zero record.
pub const SLOW_TLV: FixedTlv =
    FixedTlv::new(FieldWidth::U8, FieldWidth::U8, LengthMode::IncludesHeader)
        .with_terminator(Terminator::ZeroTypeAndLength);

pub const LACP_TLV_ACTOR_INFO: u8 = 0x01;
pub const LACP_TLV_PARTNER_INFO: u8 = 0x02;
pub const LACP_TLV_COLLECTOR_INFO: u8 = 0x03;
pub const MARKER_TLV_MARKER_INFO: u8 = 0x01;
pub const MARKER_TLV_RESPONSE_INFO: u8 = 0x02;

pub const LACP_ACTOR_PARTNER_LEN: usize = 20;
pub const LACP_COLLECTOR_LEN: usize = 16;
pub const MARKER_INFO_LEN: usize = 16;

pub const LACP_TLV_NAMES: &[(u8, &str)] = &[
    (LACP_TLV_ACTOR_INFO, "Actor Information"),
    (LACP_TLV_PARTNER_INFO, "Partner Information"),
    (LACP_TLV_COLLECTOR_INFO, "Collector Information"),
];

pub const MARKER_TLV_NAMES: &[(u8, &str)] = &[
    (MARKER_TLV_MARKER_INFO, "Marker Information"),
    (MARKER_TLV_RESPONSE_INFO, "Marker Response Information"),
];

pub const LACP_STATE_FLAGS: &[(u8, &str)] = &[
    (0x01, "Activity"),
    (0x02, "Timeout"),
    (0x04, "Aggregation"),
    (0x08, "Synchronization"),
    (0x10, "Collecting"),
    (0x20, "Distributing"),
    (0x40, "Default"),
    (0x80, "Expired"),
];

pub const OAM_CODE_INFO: u8 = 0x00;

pub const OAM_CODES: &[(u8, &str)] = &[
    (OAM_CODE_INFO, "Information"),
    (0x01, "Event Notification"),
    (0x02, "Variable Request"),
    (0x03, "Variable Response"),
    (0x04, "Loopback Control"),
    (0xfe, "Vendor Private"),
];

pub const OAM_FLAGS: &[(u16, &str)] = &[
    (0x0001, "Link Fault"),
    (0x0002, "Dying Gasp"),
    (0x0004, "Critical Event"),
    (0x0008, "Local Evaluating"),
    (0x0010, "Local Stable"),
    (0x0020, "Remote Evaluating"),
    (0x0040, "Remote Stable"),
];

pub const OAM_INFO_LOCAL: u8 = 0x01;
pub const OAM_INFO_REMOTE: u8 = 0x02;
pub const OAM_INFO_ORG_SPECIFIC: u8 = 0xfe;
pub const OAM_INFO_LEN: usize = 16;

pub const OAM_INFO_NAMES: &[(u8, &str)] = &[
    (OAM_INFO_LOCAL, "Local Information"),
    (OAM_INFO_REMOTE, "Remote Information"),
    (OAM_INFO_ORG_SPECIFIC, "Organization Specific"),
];
