use async_trait::async_trait;
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;

/// Final delivery of a response to the client transport.
#[async_trait]
pub trait ResponseSink: Send {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError>;

    /// Delivers an already encoded response.
    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), DomainError>;
}
