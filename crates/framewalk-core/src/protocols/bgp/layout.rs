use crate::engine::{FieldWidth, FixedTlv, LengthMode};

pub const PORT_BGP: u16 = 179;

pub const MARKER_LEN: usize = 16;
/// Marker, length and type.
pub const HEADER_LEN: usize = 19;

pub const MSG_OPEN: u8 = 1;
pub const MSG_UPDATE: u8 = 2;
pub const MSG_NOTIFICATION: u8 = 3;
pub const MSG_KEEPALIVE: u8 = 4;
pub const MSG_ROUTE_REFRESH: u8 = 5;

pub const MESSAGE_NAMES: &[(u8, &str)] = &[
    (MSG_OPEN, "OPEN"),
    (MSG_UPDATE, "UPDATE"),
    (MSG_NOTIFICATION, "NOTIFICATION"),
    (MSG_KEEPALIVE, "KEEPALIVE"),
    (MSG_ROUTE_REFRESH, "ROUTE-REFRESH"),
];

/// Version, my AS, hold time, identifier, parameter length.
pub const OPEN_FIXED_LEN: usize = 10;

/// OPEN optional parameters and the capabilities inside them share one
/// shape: 8-bit type and body length.
pub const OPEN_PARAM_TLV: FixedTlv =
    FixedTlv::new(FieldWidth::U8, FieldWidth::U8, LengthMode::BodyOnly);

pub const OPT_AUTH: u8 = 1;
pub const OPT_CAPABILITIES: u8 = 2;

pub const OPT_NAMES: &[(u8, &str)] = &[
    (OPT_AUTH, "Authentication Information"),
    (OPT_CAPABILITIES, "Capabilities Advertisement"),
];

pub const CAP_MP: u8 = 1;
pub const CAP_ROUTE_REFRESH: u8 = 2;
pub const CAP_GRACEFUL_RESTART: u8 = 64;
pub const CAP_AS4: u8 = 65;
pub const CAP_ADD_PATH: u8 = 69;
pub const CAP_ENHANCED_ROUTE_REFRESH: u8 = 70;
pub const CAP_LONG_LIVED_GR: u8 = 71;
pub const CAP_FQDN: u8 = 73;
pub const CAP_ROUTE_REFRESH_CISCO: u8 = 128;

pub const CAPABILITY_NAMES: &[(u8, &str)] = &[
    (CAP_MP, "Multiprotocol Extensions"),
    (CAP_ROUTE_REFRESH, "Route Refresh"),
    (CAP_GRACEFUL_RESTART, "Graceful Restart"),
    (CAP_AS4, "32-Bit AS Number"),
    (CAP_ADD_PATH, "Multiple Paths"),
    (CAP_ENHANCED_ROUTE_REFRESH, "Enhanced Route Refresh"),
    (CAP_LONG_LIVED_GR, "Long-lived Graceful Restart"),
    (CAP_FQDN, "FQDN"),
    (CAP_ROUTE_REFRESH_CISCO, "Route Refresh (Cisco)"),
];

pub const ATTR_FLAG_OPTIONAL: u8 = 0x80;
pub const ATTR_FLAG_TRANSITIVE: u8 = 0x40;
pub const ATTR_FLAG_PARTIAL: u8 = 0x20;
/// Attribute length is two bytes instead of one.
pub const ATTR_FLAG_EXTENDED_LENGTH: u8 = 0x10;

pub const ATTR_ORIGIN: u8 = 1;
pub const ATTR_AS_PATH: u8 = 2;
pub const ATTR_NEXT_HOP: u8 = 3;
pub const ATTR_MULTI_EXIT_DISC: u8 = 4;
pub const ATTR_LOCAL_PREF: u8 = 5;
pub const ATTR_ATOMIC_AGGREGATE: u8 = 6;
pub const ATTR_AGGREGATOR: u8 = 7;
pub const ATTR_COMMUNITIES: u8 = 8;
pub const ATTR_ORIGINATOR_ID: u8 = 9;
pub const ATTR_CLUSTER_LIST: u8 = 10;
pub const ATTR_MP_REACH_NLRI: u8 = 14;
pub const ATTR_MP_UNREACH_NLRI: u8 = 15;
pub const ATTR_EXT_COMMUNITIES: u8 = 16;
pub const ATTR_AS4_PATH: u8 = 17;
pub const ATTR_AGGREGATOR4: u8 = 18;
pub const ATTR_LARGE_COMMUNITY: u8 = 32;

pub const ATTR_NAMES: &[(u8, &str)] = &[
    (ATTR_ORIGIN, "Origin"),
    (ATTR_AS_PATH, "AS Path"),
    (ATTR_NEXT_HOP, "Next Hop"),
    (ATTR_MULTI_EXIT_DISC, "Multi Exit Discriminator"),
    (ATTR_LOCAL_PREF, "Local Preference"),
    (ATTR_ATOMIC_AGGREGATE, "Atomic Aggregate"),
    (ATTR_AGGREGATOR, "Aggregator"),
    (ATTR_COMMUNITIES, "Community"),
    (ATTR_ORIGINATOR_ID, "Originator ID"),
    (ATTR_CLUSTER_LIST, "Cluster List"),
    (ATTR_MP_REACH_NLRI, "Multi-Protocol Reach NLRI"),
    (ATTR_MP_UNREACH_NLRI, "Multi-Protocol Unreach NLRI"),
    (ATTR_EXT_COMMUNITIES, "Extended Community"),
    (ATTR_AS4_PATH, "AS4 Path"),
    (ATTR_AGGREGATOR4, "AS4 Aggregator"),
    (ATTR_LARGE_COMMUNITY, "Large Community"),
];

pub const ORIGIN_NAMES: &[(u8, &str)] = &[(0, "IGP"), (1, "EGP"), (2, "Incomplete")];

pub const AS_SET: u8 = 1;
pub const AS_SEQUENCE: u8 = 2;
pub const AS_CONFED_SEQUENCE: u8 = 3;
pub const AS_CONFED_SET: u8 = 4;

/// Opening and closing text around each AS path segment type.
pub const AS_SEGMENT_DELIMITERS: &[(u8, (&str, &str))] = &[
    (AS_SET, ("{ ", "}")),
    (AS_SEQUENCE, ("", "")),
    (AS_CONFED_SEQUENCE, ("( ", ")")),
    (AS_CONFED_SET, ("({ ", "})")),
];

pub const COMMUNITY_NO_EXPORT: u32 = 0xffff_ff01;
pub const COMMUNITY_NO_ADVERT: u32 = 0xffff_ff02;
pub const COMMUNITY_NO_EXPORT_SUBCONFED: u32 = 0xffff_ff03;

pub const WELL_KNOWN_COMMUNITIES: &[(u32, &str)] = &[
    (COMMUNITY_NO_EXPORT, "NO_EXPORT"),
    (COMMUNITY_NO_ADVERT, "NO_ADVERTISE"),
    (COMMUNITY_NO_EXPORT_SUBCONFED, "NO_EXPORT_SUBCONFED"),
];

pub const AFI_IPV4: u16 = 1;
pub const AFI_IPV6: u16 = 2;
pub const AFI_L2VPN: u16 = 25;

pub const AFI_NAMES: &[(u16, &str)] = &[
    (AFI_IPV4, "IPv4"),
    (AFI_IPV6, "IPv6"),
    (AFI_L2VPN, "Layer-2 VPN"),
];

pub const SAFI_UNICAST: u8 = 1;
pub const SAFI_MULTICAST: u8 = 2;
pub const SAFI_LABUNICAST: u8 = 4;

pub const SAFI_NAMES: &[(u8, &str)] = &[
    (SAFI_UNICAST, "Unicast"),
    (SAFI_MULTICAST, "Multicast"),
    (SAFI_LABUNICAST, "labeled Unicast"),
    (65, "VPLS"),
    (70, "EVPN"),
    (128, "labeled VPN Unicast"),
    (129, "labeled VPN Multicast"),
    (133, "Flow Spec"),
];

pub const NOTIFICATION_NAMES: &[(u8, &str)] = &[
    (1, "Message Header Error"),
    (2, "OPEN Message Error"),
    (3, "UPDATE Message Error"),
    (4, "Hold Timer Expired"),
    (5, "Finite State Machine Error"),
    (6, "Cease"),
    (7, "ROUTE-REFRESH Message Error"),
];
