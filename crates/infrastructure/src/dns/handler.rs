use super::forwarding::{MessageBuilder, RcodePolicy, UpstreamForwarder};
use async_trait::async_trait;
use ferrous_dns64_application::ports::{HandlerResponse, QueryHandler};
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

/// Downstream handler that relays client queries to the upstream resolvers.
pub struct ForwardingQueryHandler {
    forwarder: Arc<UpstreamForwarder>,
}

impl ForwardingQueryHandler {
    pub fn new(forwarder: Arc<UpstreamForwarder>) -> Self {
        Self { forwarder }
    }
}

#[async_trait]
impl QueryHandler for ForwardingQueryHandler {
    async fn handle(
        &self,
        request: &Message,
        deadline: Instant,
    ) -> Result<HandlerResponse, DomainError> {
        let (upstream_id, bytes) = MessageBuilder::reencode(request)?;

        let attempt = self
            .forwarder
            .forward(&bytes, upstream_id, deadline, RcodePolicy::Accept)
            .await?;

        match attempt.message {
            Some(mut response) => {
                MessageBuilder::set_id(&mut response, request.id());
                Ok(HandlerResponse::Message(response))
            }
            None => {
                debug!(server = %attempt.server_addr, "Relaying undecodable response as raw bytes");
                let mut raw = attempt.bytes.to_vec();
                raw[..2].copy_from_slice(&request.id().to_be_bytes());
                Ok(HandlerResponse::Raw(raw))
            }
        }
    }
}
