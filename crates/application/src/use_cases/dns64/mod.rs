mod classify;
mod context;
mod gate;
mod rewrite;
mod writer;

pub use classify::classify;
pub use context::RequestContext;
pub use gate::should_translate;
pub use rewrite::{rewrite, rewritten, RewriteSummary, SkippedRecord, DEFAULT_NS_TTL};
pub use writer::Dns64Writer;

use crate::ports::{ResponseSink, UpstreamLookup};
use ferrous_dns64_domain::{Dns64Settings, DomainError, ResponseClass, UpstreamFailurePolicy};
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tracing::{debug, debug_span, warn, Span};

/// What happened to one response.
#[derive(Debug, Clone)]
pub enum Dns64Outcome {
    PassThrough(ResponseClass),
    Translated(RewriteSummary),
    LookupFailed {
        error: DomainError,
        policy: UpstreamFailurePolicy,
    },
}

/// DNS64 synthesis (RFC 6147) over responses from the downstream handler.
#[derive(Clone)]
pub struct Dns64UseCase {
    settings: Arc<Dns64Settings>,
    lookup: Arc<dyn UpstreamLookup>,
    span: Span,
}

impl Dns64UseCase {
    pub fn new(settings: Arc<Dns64Settings>, lookup: Arc<dyn UpstreamLookup>) -> Self {
        Self {
            settings,
            lookup,
            span: tracing::info_span!("dns64"),
        }
    }

    /// Parent span for every event this use case emits.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Wraps `sink` so the response for `ctx` goes through DNS64.
    pub fn writer<S: ResponseSink>(&self, sink: S, ctx: RequestContext) -> Dns64Writer<S> {
        let span = debug_span!(
            parent: &self.span,
            "dns64_query",
            name = %ctx.name,
            client = %ctx.client
        );
        Dns64Writer::new(sink, self.clone(), ctx, span)
    }

    pub async fn process(&self, ctx: &RequestContext, response: Message) -> (Message, Dns64Outcome) {
        self.process_in(&self.span, ctx, response).await
    }

    pub(crate) async fn process_in(
        &self,
        span: &Span,
        ctx: &RequestContext,
        mut response: Message,
    ) -> (Message, Dns64Outcome) {
        let class = classify(&response);

        if !should_translate(ctx, &response, class, &self.settings) {
            debug!(parent: span, class = %class, query_type = %ctx.query_type, "DNS64 pass-through");
            return (response, Dns64Outcome::PassThrough(class));
        }

        let lookup = tokio::time::timeout_at(ctx.deadline, self.lookup.lookup_a(&ctx.name, ctx.deadline))
            .await
            .unwrap_or(Err(DomainError::QueryTimeout));

        match lookup {
            Ok(replacement) => {
                let summary = rewrite(&mut response, &replacement, &self.settings.prefix);
                for skipped in &summary.skipped {
                    warn!(
                        parent: span,
                        name = %skipped.record.name(),
                        error = %skipped.error,
                        "Dropping A record that cannot be embedded"
                    );
                }
                debug!(
                    parent: span,
                    class = %class,
                    synthesized = summary.synthesized,
                    prefix = %self.settings.prefix,
                    "DNS64 synthesized AAAA answers"
                );
                (response, Dns64Outcome::Translated(summary))
            }
            Err(error) => {
                let policy = self.settings.failure_policy;
                warn!(
                    parent: span,
                    name = %ctx.name,
                    lookup = self.lookup.name(),
                    error = %error,
                    policy = policy.as_str(),
                    "DNS64 A lookup failed"
                );
                if policy == UpstreamFailurePolicy::ServFail {
                    servfail(&mut response);
                }
                (response, Dns64Outcome::LookupFailed { error, policy })
            }
        }
    }
}

fn servfail(response: &mut Message) {
    response.set_response_code(ResponseCode::ServFail);
    response.take_answers();
    response.take_name_servers();
}
