use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid NAT64 prefix: {0}")]
    InvalidPrefix(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Invalid DNS request: {0}")]
    InvalidDnsRequest(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Upstream lookup failed: {0}")]
    UpstreamFailure(String),

    #[error("Failed to deliver response: {0}")]
    DeliveryFailed(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("No upstream servers configured")]
    TransportNoHealthyServers,

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,
}
