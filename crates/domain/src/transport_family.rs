use std::net::{IpAddr, SocketAddr};

/// Address family of the transport a query arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFamily {
    V4,
    V6,
}

impl TransportFamily {
    /// Family of a client address. IPv4-mapped IPv6 peers, as seen on
    /// dual-stack sockets, are IPv4 clients.
    pub fn from_ip(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, Self::V6)
    }
}

impl From<SocketAddr> for TransportFamily {
    fn from(addr: SocketAddr) -> Self {
        Self::from_ip(addr.ip())
    }
}
