use crate::engine::{FieldWidth, FixedTlv, LengthMode};

pub const PORT_AUTH: u16 = 1812;
pub const PORT_ACCT: u16 = 1813;
pub const PORT_AUTH_OLD: u16 = 1645;
pub const PORT_ACCT_OLD: u16 = 1646;
/// Dynamic authorization (disconnect and CoA).
pub const PORT_DYNAMIC_AUTH: u16 = 3799;

pub const PORTS: &[u16] = &[PORT_AUTH, PORT_ACCT, PORT_AUTH_OLD, PORT_ACCT_OLD, PORT_DYNAMIC_AUTH];

/// Code, identifier, length and authenticator.
pub const HEADER_LEN: usize = 20;
pub const AUTHENTICATOR_LEN: usize = 16;
pub const MAX_LEN: usize = 4096;

/// Attributes and vendor sub-attributes: 8-bit type, 8-bit length counting
/// the two header bytes.
pub const ATTRIBUTE_TLV: FixedTlv =
    FixedTlv::new(FieldWidth::U8, FieldWidth::U8, LengthMode::IncludesHeader).with_min_len(2);

pub const CODE_NAMES: &[(u8, &str)] = &[
    (1, "Access-Request"),
    (2, "Access-Accept"),
    (3, "Access-Reject"),
    (4, "Accounting-Request"),
    (5, "Accounting-Response"),
    (11, "Access-Challenge"),
    (12, "Status-Server"),
    (13, "Status-Client"),
    (40, "Disconnect-Request"),
    (41, "Disconnect-ACK"),
    (42, "Disconnect-NAK"),
    (43, "CoA-Request"),
    (44, "CoA-ACK"),
    (45, "CoA-NAK"),
];

pub const ATTR_USER_NAME: u8 = 1;
pub const ATTR_USER_PASSWORD: u8 = 2;
pub const ATTR_CHAP_PASSWORD: u8 = 3;
pub const ATTR_NAS_IP_ADDRESS: u8 = 4;
pub const ATTR_NAS_PORT: u8 = 5;
pub const ATTR_SERVICE_TYPE: u8 = 6;
pub const ATTR_FRAMED_PROTOCOL: u8 = 7;
pub const ATTR_FRAMED_IP_ADDRESS: u8 = 8;
pub const ATTR_FRAMED_IP_NETMASK: u8 = 9;
pub const ATTR_FILTER_ID: u8 = 11;
pub const ATTR_FRAMED_MTU: u8 = 12;
pub const ATTR_REPLY_MESSAGE: u8 = 18;
pub const ATTR_STATE: u8 = 24;
pub const ATTR_CLASS: u8 = 25;
pub const ATTR_VENDOR_SPECIFIC: u8 = 26;
pub const ATTR_SESSION_TIMEOUT: u8 = 27;
pub const ATTR_IDLE_TIMEOUT: u8 = 28;
pub const ATTR_CALLED_STATION_ID: u8 = 30;
pub const ATTR_CALLING_STATION_ID: u8 = 31;
pub const ATTR_NAS_IDENTIFIER: u8 = 32;
pub const ATTR_ACCT_STATUS_TYPE: u8 = 40;
pub const ATTR_ACCT_DELAY_TIME: u8 = 41;
pub const ATTR_ACCT_INPUT_OCTETS: u8 = 42;
pub const ATTR_ACCT_OUTPUT_OCTETS: u8 = 43;
pub const ATTR_ACCT_SESSION_ID: u8 = 44;
pub const ATTR_ACCT_SESSION_TIME: u8 = 46;
pub const ATTR_EVENT_TIMESTAMP: u8 = 55;
pub const ATTR_NAS_PORT_TYPE: u8 = 61;
pub const ATTR_EAP_MESSAGE: u8 = 79;
pub const ATTR_MESSAGE_AUTHENTICATOR: u8 = 80;
pub const ATTR_NAS_PORT_ID: u8 = 87;
pub const ATTR_NAS_IPV6_ADDRESS: u8 = 95;

/// How an attribute value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Address,
    Address6,
    Integer,
    /// Integer with named values.
    Enumerated(&'static [(u32, &'static str)]),
    Octets,
    Vendor,
}

pub const SERVICE_TYPES: &[(u32, &str)] = &[
    (1, "Login"),
    (2, "Framed"),
    (3, "Callback Login"),
    (4, "Callback Framed"),
    (5, "Outbound"),
    (6, "Administrative"),
    (7, "NAS Prompt"),
    (8, "Authenticate Only"),
];

pub const FRAMED_PROTOCOLS: &[(u32, &str)] = &[(1, "PPP"), (2, "SLIP"), (3, "ARAP")];

pub const ACCT_STATUS_TYPES: &[(u32, &str)] = &[
    (1, "Start"),
    (2, "Stop"),
    (3, "Interim-Update"),
    (7, "Accounting-On"),
    (8, "Accounting-Off"),
];

pub const NAS_PORT_TYPES: &[(u32, &str)] = &[
    (0, "Async"),
    (1, "Sync"),
    (2, "ISDN Sync"),
    (5, "Virtual"),
    (15, "Ethernet"),
    (19, "Wireless - IEEE 802.11"),
];

pub const ATTRIBUTES: &[(u8, &str, ValueKind)] = &[
    (ATTR_USER_NAME, "User-Name", ValueKind::Text),
    (ATTR_USER_PASSWORD, "User-Password", ValueKind::Octets),
    (ATTR_CHAP_PASSWORD, "CHAP-Password", ValueKind::Octets),
    (ATTR_NAS_IP_ADDRESS, "NAS-IP-Address", ValueKind::Address),
    (ATTR_NAS_PORT, "NAS-Port", ValueKind::Integer),
    (ATTR_SERVICE_TYPE, "Service-Type", ValueKind::Enumerated(SERVICE_TYPES)),
    (ATTR_FRAMED_PROTOCOL, "Framed-Protocol", ValueKind::Enumerated(FRAMED_PROTOCOLS)),
    (ATTR_FRAMED_IP_ADDRESS, "Framed-IP-Address", ValueKind::Address),
    (ATTR_FRAMED_IP_NETMASK, "Framed-IP-Netmask", ValueKind::Address),
    (ATTR_FILTER_ID, "Filter-Id", ValueKind::Text),
    (ATTR_FRAMED_MTU, "Framed-MTU", ValueKind::Integer),
    (ATTR_REPLY_MESSAGE, "Reply-Message", ValueKind::Text),
    (ATTR_STATE, "State", ValueKind::Octets),
    (ATTR_CLASS, "Class", ValueKind::Octets),
    (ATTR_VENDOR_SPECIFIC, "Vendor-Specific", ValueKind::Vendor),
    (ATTR_SESSION_TIMEOUT, "Session-Timeout", ValueKind::Integer),
    (ATTR_IDLE_TIMEOUT, "Idle-Timeout", ValueKind::Integer),
    (ATTR_CALLED_STATION_ID, "Called-Station-Id", ValueKind::Text),
    (ATTR_CALLING_STATION_ID, "Calling-Station-Id", ValueKind::Text),
    (ATTR_NAS_IDENTIFIER, "NAS-Identifier", ValueKind::Text),
    (ATTR_ACCT_STATUS_TYPE, "Acct-Status-Type", ValueKind::Enumerated(ACCT_STATUS_TYPES)),
    (ATTR_ACCT_DELAY_TIME, "Acct-Delay-Time", ValueKind::Integer),
    (ATTR_ACCT_INPUT_OCTETS, "Acct-Input-Octets", ValueKind::Integer),
    (ATTR_ACCT_OUTPUT_OCTETS, "Acct-Output-Octets", ValueKind::Integer),
    (ATTR_ACCT_SESSION_ID, "Acct-Session-Id", ValueKind::Text),
    (ATTR_ACCT_SESSION_TIME, "Acct-Session-Time", ValueKind::Integer),
    (ATTR_EVENT_TIMESTAMP, "Event-Timestamp", ValueKind::Integer),
    (ATTR_NAS_PORT_TYPE, "NAS-Port-Type", ValueKind::Enumerated(NAS_PORT_TYPES)),
    (ATTR_EAP_MESSAGE, "EAP-Message", ValueKind::Octets),
    (ATTR_MESSAGE_AUTHENTICATOR, "Message-Authenticator", ValueKind::Octets),
    (ATTR_NAS_PORT_ID, "NAS-Port-Id", ValueKind::Text),
    (ATTR_NAS_IPV6_ADDRESS, "NAS-IPv6-Address", ValueKind::Address6),
];

/// SMI private enterprise numbers seen in Vendor-Specific attributes.
pub const VENDOR_NAMES: &[(u32, &str)] = &[
    (9, "Cisco"),
    (311, "Microsoft"),
    (2636, "Juniper"),
    (3076, "Altiga"),
    (14122, "WISPr"),
    (14988, "Mikrotik"),
];
