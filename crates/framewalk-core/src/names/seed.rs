//! Static name tables consulted before any formatting or resolution.

pub(crate) const ETHERNET_ADDRESSES: &[([u8; 6], &str)] = &[
    ([0xff, 0xff, 0xff, 0xff, 0xff, 0xff], "Broadcast"),
    ([0x01, 0x80, 0xc2, 0x00, 0x00, 0x00], "STP-multicast"),
    ([0x01, 0x80, 0xc2, 0x00, 0x00, 0x02], "Slow-Protocols"),
    ([0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e], "LLDP-multicast"),
    ([0x01, 0x00, 0x0c, 0xcc, 0xcc, 0xcc], "CDP/VTP/DTP/PAgP/UDLD"),
    ([0x01, 0x00, 0x0c, 0xcc, 0xcc, 0xcd], "PVST+"),
    ([0x01, 0x00, 0x5e, 0x00, 0x00, 0x01], "IPv4-all-hosts"),
    ([0x01, 0x00, 0x5e, 0x00, 0x00, 0x0a], "EIGRP-routers"),
    ([0x33, 0x33, 0x00, 0x00, 0x00, 0x01], "IPv6-all-nodes"),
    ([0x33, 0x33, 0x00, 0x00, 0x00, 0x02], "IPv6-all-routers"),
];

pub(crate) const IP_PROTOCOLS: &[(u8, &str)] = &[
    (0, "HOPOPT"),
    (1, "ICMP"),
    (2, "IGMP"),
    (4, "IPIP"),
    (6, "TCP"),
    (8, "EGP"),
    (17, "UDP"),
    (41, "IPv6"),
    (43, "IPv6-Route"),
    (44, "IPv6-Frag"),
    (46, "RSVP"),
    (47, "GRE"),
    (50, "ESP"),
    (51, "AH"),
    (58, "ICMPv6"),
    (59, "IPv6-NoNxt"),
    (60, "IPv6-Opts"),
    (88, "EIGRP"),
    (89, "OSPF"),
    (103, "PIM"),
    (112, "VRRP"),
    (115, "L2TP"),
    (132, "SCTP"),
];

pub(crate) const LLC_SAPS: &[(u8, &str)] = &[
    (0x00, "Null"),
    (0x02, "802.1B I"),
    (0x03, "802.1B G"),
    (0x04, "SNA"),
    (0x06, "IP"),
    (0x0e, "ProWay NM"),
    (0x42, "STP"),
    (0x4e, "RS511"),
    (0x7e, "ISO8208"),
    (0x8e, "ProWay"),
    (0xaa, "SNAP"),
    (0xe0, "IPX"),
    (0xf0, "NetBeui"),
    (0xfe, "OSI"),
    (0xff, "Global"),
];

pub(crate) const ETHERTYPES: &[(u16, &str)] = &[
    (0x0800, "IPv4"),
    (0x0806, "ARP"),
    (0x8035, "Reverse ARP"),
    (0x809b, "Appletalk"),
    (0x8100, "802.1Q"),
    (0x8137, "IPX"),
    (0x86dd, "IPv6"),
    (0x8809, "Slow Protocols"),
    (0x8847, "MPLS unicast"),
    (0x8848, "MPLS multicast"),
    (0x8863, "PPPoE D"),
    (0x8864, "PPPoE S"),
    (0x888e, "EAPOL"),
    (0x88a8, "802.1Q-QinQ"),
    (0x88cc, "LLDP"),
];

pub(crate) const OUIS: &[(u32, &str)] = &[
    (0x000000, "Ethernet"),
    (0x00000c, "Cisco"),
    (0x0000f8, "Cisco bridged"),
    (0x0080c2, "IEEE 802.1 Private"),
    (0x00120f, "IEEE 802.3 Private"),
    (0x009069, "Juniper"),
    (0x00a03e, "ATM Forum"),
    (0x00e02f, "DOCSIS Spanning Tree"),
    (0x080007, "Appletalk"),
    (0x080009, "Hewlett-Packard"),
];

pub(crate) const TCP_SERVICES: &[(u16, &str)] = &[
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (53, "domain"),
    (80, "http"),
    (110, "pop3"),
    (143, "imap"),
    (179, "bgp"),
    (389, "ldap"),
    (443, "https"),
    (646, "ldp"),
    (3306, "mysql"),
];

pub(crate) const UDP_SERVICES: &[(u16, &str)] = &[
    (53, "domain"),
    (67, "bootps"),
    (68, "bootpc"),
    (69, "tftp"),
    (123, "ntp"),
    (161, "snmp"),
    (162, "snmptrap"),
    (514, "syslog"),
    (646, "ldp"),
    (1645, "radius-old"),
    (1646, "radacct-old"),
    (1812, "radius"),
    (1813, "radius-acct"),
    (3799, "radius-dynauth"),
];

pub(crate) fn find<K: PartialEq + Copy>(table: &[(K, &'static str)], key: K) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unique<K: PartialEq + Copy + std::fmt::Debug>(table: &[(K, &str)]) {
        for (index, (key, _)) in table.iter().enumerate() {
            assert!(
                table[index + 1..].iter().all(|(other, _)| other != key),
                "duplicate key {key:?}"
            );
        }
    }

    #[test]
    fn tables_have_unique_keys() {
        assert_unique(ETHERNET_ADDRESSES);
        assert_unique(IP_PROTOCOLS);
        assert_unique(LLC_SAPS);
        assert_unique(ETHERTYPES);
        assert_unique(OUIS);
        assert_unique(TCP_SERVICES);
        assert_unique(UDP_SERVICES);
    }

    #[test]
    fn find_returns_seeded_name() {
        assert_eq!(find(IP_PROTOCOLS, 88), Some("EIGRP"));
        assert_eq!(find(LLC_SAPS, 0x43), None);
    }
}
