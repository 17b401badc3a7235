use crate::engine::{FieldWidth, FixedTlv, LengthMode};

pub const PORT_LDP: u16 = 646;

pub const VERSION: u16 = 1;
/// Version and PDU length.
pub const PDU_PREFIX_LEN: usize = 4;
/// LSR id and label space, counted by the PDU length.
pub const PDU_ID_LEN: usize = 6;

/// Messages: U bit plus 15-bit type, body length, then a message id.
pub const MESSAGE_TLV: FixedTlv =
    FixedTlv::new(FieldWidth::U16, FieldWidth::U16, LengthMode::BodyOnly)
        .with_type_mask(0x7fff)
        .with_min_len(8);
/// Parameters: U and F bits plus 14-bit type, body length.
pub const PARAM_TLV: FixedTlv =
    FixedTlv::new(FieldWidth::U16, FieldWidth::U16, LengthMode::BodyOnly).with_type_mask(0x3fff);

pub const MSG_NOTIFICATION: u16 = 0x0001;
pub const MSG_HELLO: u16 = 0x0100;
pub const MSG_INIT: u16 = 0x0200;
pub const MSG_KEEPALIVE: u16 = 0x0201;
pub const MSG_ADDRESS: u16 = 0x0300;
pub const MSG_ADDRESS_WITHDRAW: u16 = 0x0301;
pub const MSG_LABEL_MAPPING: u16 = 0x0400;
pub const MSG_LABEL_REQUEST: u16 = 0x0401;
pub const MSG_LABEL_WITHDRAW: u16 = 0x0402;
pub const MSG_LABEL_RELEASE: u16 = 0x0403;
pub const MSG_LABEL_ABORT_REQUEST: u16 = 0x0404;

pub const MESSAGE_NAMES: &[(u16, &str)] = &[
    (MSG_NOTIFICATION, "Notification"),
    (MSG_HELLO, "Hello"),
    (MSG_INIT, "Initialization"),
    (MSG_KEEPALIVE, "Keep-Alive"),
    (MSG_ADDRESS, "Address"),
    (MSG_ADDRESS_WITHDRAW, "Address Withdraw"),
    (MSG_LABEL_MAPPING, "Label Mapping"),
    (MSG_LABEL_REQUEST, "Label Request"),
    (MSG_LABEL_WITHDRAW, "Label Withdraw"),
    (MSG_LABEL_RELEASE, "Label Release"),
    (MSG_LABEL_ABORT_REQUEST, "Label Abort Request"),
];

pub const TLV_FEC: u16 = 0x0100;
pub const TLV_ADDRESS_LIST: u16 = 0x0101;
pub const TLV_HOP_COUNT: u16 = 0x0103;
pub const TLV_PATH_VECTOR: u16 = 0x0104;
pub const TLV_GENERIC_LABEL: u16 = 0x0200;
pub const TLV_ATM_LABEL: u16 = 0x0201;
pub const TLV_FR_LABEL: u16 = 0x0202;
pub const TLV_STATUS: u16 = 0x0300;
pub const TLV_EXTENDED_STATUS: u16 = 0x0301;
pub const TLV_RETURNED_PDU: u16 = 0x0302;
pub const TLV_RETURNED_MESSAGE: u16 = 0x0303;
pub const TLV_COMMON_HELLO: u16 = 0x0400;
pub const TLV_IPV4_TRANSPORT_ADDR: u16 = 0x0401;
pub const TLV_CONFIG_SEQ_NUMBER: u16 = 0x0402;
pub const TLV_IPV6_TRANSPORT_ADDR: u16 = 0x0403;
pub const TLV_COMMON_SESSION: u16 = 0x0500;
pub const TLV_ATM_SESSION_PARM: u16 = 0x0501;
pub const TLV_FR_SESSION_PARM: u16 = 0x0502;
pub const TLV_LABEL_REQUEST_MSG_ID: u16 = 0x0600;

pub const TLV_NAMES: &[(u16, &str)] = &[
    (TLV_FEC, "FEC"),
    (TLV_ADDRESS_LIST, "Address List"),
    (TLV_HOP_COUNT, "Hop Count"),
    (TLV_PATH_VECTOR, "Path Vector"),
    (TLV_GENERIC_LABEL, "Generic Label"),
    (TLV_ATM_LABEL, "ATM Label"),
    (TLV_FR_LABEL, "Frame-Relay Label"),
    (TLV_STATUS, "Status"),
    (TLV_EXTENDED_STATUS, "Extended Status"),
    (TLV_RETURNED_PDU, "Returned PDU"),
    (TLV_RETURNED_MESSAGE, "Returned Message"),
    (TLV_COMMON_HELLO, "Common Hello Parameters"),
    (TLV_IPV4_TRANSPORT_ADDR, "IPv4 Transport Address"),
    (TLV_CONFIG_SEQ_NUMBER, "Configuration Sequence Number"),
    (TLV_IPV6_TRANSPORT_ADDR, "IPv6 Transport Address"),
    (TLV_COMMON_SESSION, "Common Session Parameters"),
    (TLV_ATM_SESSION_PARM, "ATM Session Parameters"),
    (TLV_FR_SESSION_PARM, "Frame-Relay Session Parameters"),
    (TLV_LABEL_REQUEST_MSG_ID, "Label Request Message ID"),
];

pub const HELLO_TARGETED: u16 = 0x8000;
pub const HELLO_REQUEST_TARGETED: u16 = 0x4000;

pub const FEC_WILDCARD: u8 = 0x01;
pub const FEC_PREFIX: u8 = 0x02;
pub const FEC_HOSTADDRESS: u8 = 0x03;

pub const AFNUM_INET: u16 = 1;
pub const AFNUM_INET6: u16 = 2;

pub const LABEL_MASK: u32 = 0x000f_ffff;
