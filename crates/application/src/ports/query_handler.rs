use async_trait::async_trait;
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use tokio::time::Instant;

/// Tentative response produced by the downstream handler.
#[derive(Debug, Clone)]
pub enum HandlerResponse {
    Message(Message),
    /// Wire bytes that could not be decoded; relayed as-is.
    Raw(Vec<u8>),
}

#[async_trait]
pub trait QueryHandler: Send + Sync {
    /// Answer `request`. The response keeps the request's ID and question.
    async fn handle(&self, request: &Message, deadline: Instant)
        -> Result<HandlerResponse, DomainError>;
}
