//! The fixed list of public DNS servers queried when the local resolver fails.

use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    sync::Arc,
};

/// Standard DNS port.
pub const DNS_PORT: u16 = 53;

/// Public resolvers raced when the local lookup fails, IPv4 first.
pub const PUBLIC_DNS_SERVERS: [IpAddr; 9] = [
    IpAddr::V4(Ipv4Addr::new(1, 0, 0, 1)),       // Cloudflare
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),       // Cloudflare
    IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)),       // Google
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),       // Google
    IpAddr::V4(Ipv4Addr::new(8, 26, 56, 26)),    // Comodo
    IpAddr::V4(Ipv4Addr::new(208, 67, 220, 220)), // Cisco OpenDNS
    IpAddr::V4(Ipv4Addr::new(208, 67, 222, 222)), // Cisco OpenDNS
    IpAddr::V6(Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8844)), // Google
    IpAddr::V6(Ipv6Addr::new(0x2001, 0x4860, 0x4860, 0, 0, 0, 0, 0x8888)), // Google
];

/// Ordered, immutable set of DNS server addresses.
///
/// Cloning shares the underlying slice; there is no way to mutate a roster
/// once built, so workers read it without synchronization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    servers: Arc<[SocketAddr]>,
}

impl Roster {
    /// The built-in public servers, each on port 53.
    pub fn public() -> Self {
        Self::from_ips(PUBLIC_DNS_SERVERS)
    }

    /// Servers given by IP, each on port 53.
    pub fn from_ips(ips: impl IntoIterator<Item = IpAddr>) -> Self {
        ips.into_iter()
            .map(|ip| SocketAddr::new(ip, DNS_PORT))
            .collect()
    }

    /// Number of servers, and so the number of race workers.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Servers in roster order.
    pub fn iter(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.servers.iter().copied()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::public()
    }
}

impl FromIterator<SocketAddr> for Roster {
    fn from_iter<I: IntoIterator<Item = SocketAddr>>(iter: I) -> Self {
        Self {
            servers: iter.into_iter().collect(),
        }
    }
}
