use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use super::AddressFamily;

/// External name source consulted when name resolution is enabled.
///
/// Implementations may block; the cache bounds every call with its configured
/// timeout and falls back to the numeric form.
pub trait Resolver: Send + Sync {
    fn resolve(&self, family: AddressFamily, key: &[u8]) -> Option<String>;
}

/// Resolver backed by an `/etc/hosts`-style table.
#[derive(Debug, Clone, Default)]
pub struct HostsResolver {
    hosts: HashMap<IpAddr, String>,
}

impl HostsResolver {
    /// Parse `address name [aliases...]` lines. `#` starts a comment; lines
    /// whose address does not parse are skipped. The first name seen for an
    /// address wins.
    pub fn parse(text: &str) -> Self {
        let mut hosts = HashMap::new();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or_default();
            let mut fields = line.split_whitespace();
            let (Some(address), Some(name)) = (fields.next(), fields.next()) else {
                continue;
            };
            let Ok(address) = address.parse::<IpAddr>() else {
                tracing::debug!(address, "skipping hosts entry with unparsable address");
                continue;
            };
            hosts.entry(address).or_insert_with(|| name.to_string());
        }
        Self { hosts }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Resolver for HostsResolver {
    fn resolve(&self, family: AddressFamily, key: &[u8]) -> Option<String> {
        let address = match family {
            AddressFamily::Ipv4 => IpAddr::from(<[u8; 4]>::try_from(key).ok()?),
            AddressFamily::Ipv6 => IpAddr::from(<[u8; 16]>::try_from(key).ok()?),
            _ => return None,
        };
        self.hosts.get(&address).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTS: &str = "\
# comment line
127.0.0.1   localhost loopback
10.0.0.1    gateway   # trailing comment
10.0.0.1    duplicate
::1         ip6-localhost
not-an-ip   ignored
";

    #[test]
    fn parses_hosts_text() {
        let resolver = HostsResolver::parse(HOSTS);
        assert_eq!(resolver.len(), 3);
        assert_eq!(
            resolver.resolve(AddressFamily::Ipv4, &[10, 0, 0, 1]),
            Some("gateway".to_string())
        );
        let mut loopback6 = [0u8; 16];
        loopback6[15] = 1;
        assert_eq!(
            resolver.resolve(AddressFamily::Ipv6, &loopback6),
            Some("ip6-localhost".to_string())
        );
    }

    #[test]
    fn ignores_other_families_and_bad_keys() {
        let resolver = HostsResolver::parse(HOSTS);
        assert_eq!(resolver.resolve(AddressFamily::Ethernet, &[127, 0, 0, 1]), None);
        assert_eq!(resolver.resolve(AddressFamily::Ipv4, &[127, 0, 0]), None);
    }
}
