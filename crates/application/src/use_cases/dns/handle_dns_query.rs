use super::response::error_response;
use crate::ports::{HandlerResponse, QueryHandler, ResponseSink};
use crate::use_cases::dns64::{Dns64UseCase, RequestContext};
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

pub struct HandleDnsQueryUseCase {
    handler: Arc<dyn QueryHandler>,
    dns64: Dns64UseCase,
    query_timeout: Duration,
}

impl HandleDnsQueryUseCase {
    pub fn new(handler: Arc<dyn QueryHandler>, dns64: Dns64UseCase, query_timeout: Duration) -> Self {
        Self {
            handler,
            dns64,
            query_timeout,
        }
    }

    /// Answers one client query through the downstream handler and DNS64.
    /// Exactly one response reaches `sink`.
    pub async fn execute<S: ResponseSink>(
        &self,
        request: &Message,
        client: SocketAddr,
        mut sink: S,
    ) -> Result<(), DomainError> {
        let deadline = Instant::now() + self.query_timeout;

        let ctx = match RequestContext::from_request(request, client, deadline) {
            Ok(ctx) => ctx,
            Err(e) => {
                debug!(client = %client, id = request.id(), error = %e, "Rejecting query");
                return sink
                    .write_message(error_response(request, ResponseCode::FormErr))
                    .await;
            }
        };

        debug!(
            domain = %ctx.name,
            record_type = %ctx.query_type,
            client = %client,
            "DNS query received"
        );

        let mut writer = self.dns64.writer(sink, ctx);

        let handled = tokio::time::timeout_at(deadline, self.handler.handle(request, deadline))
            .await
            .unwrap_or(Err(DomainError::QueryTimeout));

        match handled {
            Ok(HandlerResponse::Message(response)) => writer.write_message(response).await,
            Ok(HandlerResponse::Raw(bytes)) => writer.write_raw(&bytes).await,
            Err(e) => {
                warn!(
                    domain = %writer.context().name,
                    client = %client,
                    error = %e,
                    "Query handling failed"
                );
                writer
                    .write_message(error_response(request, ResponseCode::ServFail))
                    .await
            }
        }
    }
}
