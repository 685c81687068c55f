use super::query::{query_server, QueryAttemptResult};
use ferrous_dns64_domain::{DnsProtocol, DomainError};
use hickory_proto::op::ResponseCode;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Budget for one server before moving to the next.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

/// How error rcodes from an upstream are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RcodePolicy {
    /// Any decodable reply ends the search.
    Accept,
    /// SERVFAIL and REFUSED count as a failed attempt.
    FailOver,
}

/// Sequential failover over a fixed list of upstream servers.
pub struct UpstreamForwarder {
    servers: Vec<DnsProtocol>,
    attempt_timeout: Duration,
}

impl UpstreamForwarder {
    pub fn new(servers: Vec<DnsProtocol>) -> Self {
        Self {
            servers,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Tries each server in order until one answers or `deadline` passes.
    pub async fn forward(
        &self,
        query_bytes: &[u8],
        query_id: u16,
        deadline: Instant,
        policy: RcodePolicy,
    ) -> Result<QueryAttemptResult, DomainError> {
        if self.servers.is_empty() {
            return Err(DomainError::TransportNoHealthyServers);
        }
        debug!(strategy = "failover", servers = self.servers.len(), "Trying sequentially");

        for (index, protocol) in self.servers.iter().enumerate() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(DomainError::QueryTimeout);
            }

            let timeout = remaining.min(self.attempt_timeout);

            match query_server(protocol, query_bytes, query_id, timeout).await {
                Ok(r) => {
                    let rcode = r.message.as_ref().map(|m| m.response_code());
                    if policy == RcodePolicy::FailOver
                        && matches!(rcode, Some(ResponseCode::ServFail | ResponseCode::Refused))
                    {
                        warn!(protocol = %protocol, rcode = ?rcode, position = index, "Failing over");
                        continue;
                    }
                    debug!(
                        server = %r.server_addr,
                        protocol = r.protocol_used,
                        latency_ms = r.latency_ms,
                        position = index,
                        "Server responded"
                    );
                    return Ok(r);
                }
                Err(e) => {
                    warn!(protocol = %protocol, error = %e, position = index, "Failing over");
                }
            }
        }
        Err(DomainError::TransportAllServersUnreachable)
    }
}
