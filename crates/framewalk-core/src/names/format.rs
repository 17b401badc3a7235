//! Numeric display forms for binary addresses.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Colon-separated lowercase hex, the form used for MAC addresses and any
/// other opaque link-layer address.
///
/// # Examples
/// ```
/// use framewalk_core::names::format::format_bytes;
///
/// assert_eq!(format_bytes(&[0xaa, 0xbb, 0x0c]), "aa:bb:0c");
/// assert_eq!(format_bytes(&[]), "");
/// ```
pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Format 6 bytes as a MAC address; `None` for any other length.
///
/// # Examples
/// ```
/// use framewalk_core::names::format::format_mac;
///
/// let bytes = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
/// assert_eq!(format_mac(&bytes), Some("aa:bb:cc:dd:ee:ff".to_string()));
/// assert_eq!(format_mac(&bytes[..5]), None);
/// ```
pub fn format_mac(bytes: &[u8]) -> Option<String> {
    if bytes.len() != 6 {
        return None;
    }
    Some(format_bytes(bytes))
}

/// Format 4 bytes in dotted-decimal notation.
pub fn format_ipv4(bytes: &[u8]) -> Option<String> {
    let octets: [u8; 4] = bytes.try_into().ok()?;
    Some(Ipv4Addr::from(octets).to_string())
}

/// Format 16 bytes in the standard compressed IPv6 text form.
///
/// # Examples
/// ```
/// use framewalk_core::names::format::format_ipv6;
///
/// let bytes = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
/// assert_eq!(format_ipv6(&bytes), Some("2001:db8::1".to_string()));
/// ```
pub fn format_ipv6(bytes: &[u8]) -> Option<String> {
    let octets: [u8; 16] = bytes.try_into().ok()?;
    Some(Ipv6Addr::from(octets).to_string())
}

/// Big-endian 16-bit port as decimal.
pub fn format_port(bytes: &[u8]) -> Option<String> {
    let raw: [u8; 2] = bytes.try_into().ok()?;
    Some(u16::from_be_bytes(raw).to_string())
}

/// OSI NSAP in the dotted hex grouping `49.0001.1921.6800.1001.00`.
///
/// # Examples
/// ```
/// use framewalk_core::names::format::format_nsap;
///
/// let nsap = [0x49, 0x00, 0x01, 0x19, 0x21, 0x68, 0x00, 0x10, 0x01, 0x00];
/// assert_eq!(format_nsap(&nsap), "49.0001.1921.6800.1001.00");
/// ```
pub fn format_nsap(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (index, byte) in bytes.iter().enumerate() {
        out.push_str(&format!("{byte:02x}"));
        if index % 2 == 0 && index + 1 < bytes.len() {
            out.push('.');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_requires_four_bytes() {
        assert_eq!(format_ipv4(&[10, 0, 0, 1]), Some("10.0.0.1".to_string()));
        assert_eq!(format_ipv4(&[10, 0, 0]), None);
    }

    #[test]
    fn port_is_big_endian() {
        assert_eq!(format_port(&[0x00, 0x35]), Some("53".to_string()));
        assert_eq!(format_port(&[0x35]), None);
    }

    #[test]
    fn nsap_single_byte() {
        assert_eq!(format_nsap(&[0x49]), "49");
        assert_eq!(format_nsap(&[0x49, 0x00]), "49.00");
    }
}
