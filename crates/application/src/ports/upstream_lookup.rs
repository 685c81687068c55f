use async_trait::async_trait;
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::rr::Name;
use tokio::time::Instant;

/// Secondary A lookup used to synthesize AAAA answers.
///
/// Implementations must be safe to call once per triggering query and must
/// not outlive `deadline`. Retries, if any, belong to the implementation.
#[async_trait]
pub trait UpstreamLookup: Send + Sync {
    async fn lookup_a(&self, name: &Name, deadline: Instant) -> Result<Message, DomainError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}
