//! NAT64 prefix and RFC 6052 address embedding.

use crate::DomainError;
use ipnetwork::{IpNetwork, Ipv6Network};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Prefix lengths allowed by RFC 6052 §2.2.
pub const VALID_PREFIX_LENGTHS: [u8; 6] = [32, 40, 48, 56, 64, 96];

/// RFC 6052 well-known prefix.
pub const WELL_KNOWN_PREFIX: &str = "64:ff9b::/96";

/// Bits 64..71 of the synthesized address ("u" octet) must be zero.
const RESERVED_OCTET: usize = 8;

/// A validated NAT64 prefix.
///
/// Only byte-aligned IPv6 networks between /32 and /96 can be constructed,
/// so [`Nat64Prefix::embed`] never has to re-check the length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nat64Prefix {
    network: Ipv6Network,
}

impl Nat64Prefix {
    pub fn new(addr: Ipv6Addr, prefix_len: u8) -> Result<Self, DomainError> {
        if !VALID_PREFIX_LENGTHS.contains(&prefix_len) {
            return Err(DomainError::InvalidPrefix(format!(
                "'{}/{}' not a valid prefix length",
                addr, prefix_len
            )));
        }

        let network = Ipv6Network::new(addr, prefix_len)
            .map_err(|e| DomainError::InvalidPrefix(format!("'{}/{}': {}", addr, prefix_len, e)))?;

        // Host bits are dropped so the prefix compares and prints as a network.
        let network = Ipv6Network::new(network.network(), prefix_len)
            .map_err(|e| DomainError::InvalidPrefix(format!("'{}/{}': {}", addr, prefix_len, e)))?;

        if network.network().octets()[RESERVED_OCTET] != 0 {
            return Err(DomainError::InvalidPrefix(format!(
                "'{}/{}' sets reserved bits 64-71",
                network.network(),
                prefix_len
            )));
        }

        Ok(Self { network })
    }

    pub fn well_known() -> Self {
        Self {
            network: Ipv6Network::new(Ipv6Addr::new(0x64, 0xff9b, 0, 0, 0, 0, 0, 0), 96)
                .unwrap_or_else(|_| unreachable!("/96 is a valid IPv6 prefix length")),
        }
    }

    pub fn network(&self) -> Ipv6Addr {
        self.network.network()
    }

    pub fn prefix_len(&self) -> u8 {
        self.network.prefix()
    }

    /// Embeds an IPv4 address given as raw octets.
    ///
    /// Fails with [`DomainError::InvalidIpAddress`] unless `ipv4` holds
    /// exactly four bytes.
    pub fn embed(&self, ipv4: &[u8]) -> Result<Ipv6Addr, DomainError> {
        let octets: [u8; 4] = ipv4.try_into().map_err(|_| {
            DomainError::InvalidIpAddress(format!(
                "expected 4 IPv4 octets, got {}",
                ipv4.len()
            ))
        })?;
        Ok(self.embed_ipv4(Ipv4Addr::from(octets)))
    }

    /// RFC 6052 §2.2 address synthesis.
    pub fn embed_ipv4(&self, ipv4: Ipv4Addr) -> Ipv6Addr {
        let prefix = self.network.network().octets();
        let v4 = ipv4.octets();
        let prefix_bytes = usize::from(self.prefix_len() / 8);

        let mut out = [0u8; 16];
        out[..prefix_bytes].copy_from_slice(&prefix[..prefix_bytes]);

        let mut pos = prefix_bytes;
        for byte in v4 {
            if pos == RESERVED_OCTET {
                pos += 1;
            }
            out[pos] = byte;
            pos += 1;
        }

        Ipv6Addr::from(out)
    }
}

impl Default for Nat64Prefix {
    fn default() -> Self {
        Self::well_known()
    }
}

impl FromStr for Nat64Prefix {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = IpNetwork::from_str(s.trim())
            .map_err(|e| DomainError::InvalidPrefix(format!("'{}': {}", s, e)))?;

        match parsed {
            IpNetwork::V6(net) => Self::new(net.ip(), net.prefix()),
            IpNetwork::V4(_) => Err(DomainError::InvalidPrefix(format!(
                "'{}' not a valid IPv6 address",
                s
            ))),
        }
    }
}

impl fmt::Display for Nat64Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network.network(), self.network.prefix())
    }
}
