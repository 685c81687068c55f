//! Ferrous DNS64 Domain Layer
pub mod config;
pub mod dns_protocol;
pub mod errors;
pub mod nat64_prefix;
pub mod response_class;
pub mod transport_family;

pub use config::{
    CliOverrides, Config, ConfigError, Dns64Config, Dns64Settings, LookupTarget,
    UpstreamFailurePolicy,
};
pub use dns_protocol::DnsProtocol;
pub use errors::DomainError;
pub use nat64_prefix::Nat64Prefix;
pub use response_class::ResponseClass;
pub use transport_family::TransportFamily;
