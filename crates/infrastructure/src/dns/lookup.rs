//! Secondary A lookups for DNS64 synthesis.

use super::forwarding::{MessageBuilder, RcodePolicy, UpstreamForwarder};
use async_trait::async_trait;
use ferrous_dns64_application::ports::{HandlerResponse, QueryHandler, UpstreamLookup};
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RecordType};
use std::sync::Arc;
use tokio::time::Instant;

/// Sends the A query straight to dedicated DNS64 upstreams.
pub struct ProxyLookup {
    forwarder: UpstreamForwarder,
}

impl ProxyLookup {
    pub fn new(forwarder: UpstreamForwarder) -> Self {
        Self { forwarder }
    }
}

#[async_trait]
impl UpstreamLookup for ProxyLookup {
    async fn lookup_a(&self, name: &Name, deadline: Instant) -> Result<Message, DomainError> {
        let (id, bytes) = MessageBuilder::build_query(name, RecordType::A)?;

        let attempt = self
            .forwarder
            .forward(&bytes, id, deadline, RcodePolicy::FailOver)
            .await?;

        attempt.message.ok_or_else(|| {
            DomainError::InvalidDnsResponse(format!(
                "undecodable A response from {}",
                attempt.server_addr
            ))
        })
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}

/// Sends the A query back through the server's own downstream handler.
pub struct ChainLookup {
    handler: Arc<dyn QueryHandler>,
}

impl ChainLookup {
    pub fn new(handler: Arc<dyn QueryHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl UpstreamLookup for ChainLookup {
    async fn lookup_a(&self, name: &Name, deadline: Instant) -> Result<Message, DomainError> {
        let query = MessageBuilder::query(name, RecordType::A);

        match self.handler.handle(&query, deadline).await? {
            HandlerResponse::Message(response) => Ok(response),
            HandlerResponse::Raw(_) => Err(DomainError::InvalidDnsResponse(format!(
                "undecodable A response for {}",
                name
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "native"
    }
}
