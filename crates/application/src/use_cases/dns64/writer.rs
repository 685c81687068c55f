use super::context::RequestContext;
use super::Dns64UseCase;
use crate::ports::ResponseSink;
use async_trait::async_trait;
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use tracing::{warn, Span};

/// Response sink decorator that applies DNS64 before delivery.
///
/// One writer serves one request and delivers at most once.
pub struct Dns64Writer<S> {
    inner: S,
    use_case: Dns64UseCase,
    ctx: RequestContext,
    span: Span,
    delivered: bool,
}

impl<S: ResponseSink> Dns64Writer<S> {
    pub(super) fn new(inner: S, use_case: Dns64UseCase, ctx: RequestContext, span: Span) -> Self {
        Self {
            inner,
            use_case,
            ctx,
            span,
            delivered: false,
        }
    }

    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    fn claim_delivery(&mut self) -> Result<(), DomainError> {
        if self.delivered {
            return Err(DomainError::DeliveryFailed(
                "response already delivered".to_string(),
            ));
        }
        self.delivered = true;
        Ok(())
    }
}

#[async_trait]
impl<S: ResponseSink> ResponseSink for Dns64Writer<S> {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        self.claim_delivery()?;
        let (response, _) = self
            .use_case
            .process_in(&self.span, &self.ctx, response)
            .await;
        self.inner.write_message(response).await
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), DomainError> {
        self.claim_delivery()?;
        warn!(parent: &self.span, len = bytes.len(), "Raw response bypasses DNS64");
        self.inner.write_raw(bytes).await
    }
}
