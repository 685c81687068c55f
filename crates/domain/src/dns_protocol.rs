use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// An upstream DNS endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp { addr: SocketAddr },
    Tcp { addr: SocketAddr },
}

impl DnsProtocol {
    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            DnsProtocol::Udp { addr } | DnsProtocol::Tcp { addr } => *addr,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            DnsProtocol::Udp { .. } => "UDP",
            DnsProtocol::Tcp { .. } => "TCP",
        }
    }

    /// Same server over TCP, used after a truncated UDP answer.
    pub fn as_tcp(&self) -> Self {
        DnsProtocol::Tcp {
            addr: self.socket_addr(),
        }
    }
}

/// Parses `IP`, `IP:PORT`, `[IPv6]:PORT` or a bare IPv6 address.
/// Hostnames are rejected: upstreams must be reachable without resolution.
fn parse_socket_addr(s: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = s.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        if let Ok(ip) = inner.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
        }
    }
    Err(format!("'{}' is not an IP address", s))
}

impl FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_socket_addr(addr_str)
                .map_err(|e| format!("Invalid UDP address: {}", e))?;
            return Ok(DnsProtocol::Udp { addr });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_socket_addr(addr_str)
                .map_err(|e| format!("Invalid TCP address: {}", e))?;
            return Ok(DnsProtocol::Tcp { addr });
        }
        if s.contains("://") {
            return Err(format!(
                "Unsupported DNS endpoint scheme in '{}'. Expected: IP, IP:PORT, udp://IP:PORT or tcp://IP:PORT",
                s
            ));
        }
        parse_socket_addr(s)
            .map(|addr| DnsProtocol::Udp { addr })
            .map_err(|e| format!("Invalid DNS endpoint: {}", e))
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "udp://{}", addr),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
        }
    }
}
