use ferrous_dns64_domain::{DomainError, TransportFamily};
use hickory_proto::op::Message;
use hickory_proto::rr::{DNSClass, Name, RecordType};
use std::net::SocketAddr;
use tokio::time::Instant;

/// Per-request facts the synthesis decision depends on.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub family: TransportFamily,
    pub client: SocketAddr,
    pub name: Name,
    pub query_type: RecordType,
    pub query_class: DNSClass,
    pub deadline: Instant,
}

impl RequestContext {
    /// Builds the context from the first question of `request`.
    pub fn from_request(
        request: &Message,
        client: SocketAddr,
        deadline: Instant,
    ) -> Result<Self, DomainError> {
        let query = request
            .queries()
            .first()
            .ok_or_else(|| DomainError::InvalidDnsRequest("no question section".to_string()))?;

        Ok(Self {
            family: TransportFamily::from(client),
            client,
            name: query.name().clone(),
            query_type: query.query_type(),
            query_class: query.query_class(),
            deadline,
        })
    }
}
