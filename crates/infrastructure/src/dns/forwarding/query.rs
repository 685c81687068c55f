use crate::dns::transport;
use bytes::Bytes;
use ferrous_dns64_domain::{DnsProtocol, DomainError};
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::debug;

/// DNS header size; anything shorter cannot carry an ID.
const DNS_HEADER_LEN: usize = 12;

/// Result of a single-server query attempt
pub struct QueryAttemptResult {
    /// Wire bytes exactly as received.
    pub bytes: Bytes,
    /// `None` when the bytes did not decode.
    pub message: Option<Message>,
    pub server_addr: SocketAddr,
    pub protocol_used: &'static str,
    pub latency_ms: u64,
}

/// Sends `query_bytes` to one upstream and checks the reply carries
/// `query_id`. A truncated UDP reply is retried over TCP.
pub async fn query_server(
    protocol: &DnsProtocol,
    query_bytes: &[u8],
    query_id: u16,
    timeout: Duration,
) -> Result<QueryAttemptResult, DomainError> {
    let start = Instant::now();

    let response = transport::create_transport(protocol)
        .send(query_bytes, timeout)
        .await?;
    let mut attempt = inspect(protocol, response.bytes, response.protocol_used, query_id, start)?;

    let truncated = attempt.message.as_ref().is_some_and(Message::truncated);
    if truncated {
        if let DnsProtocol::Udp { addr } = protocol {
            debug!(server = %addr, "Response truncated (TC bit), retrying via TCP");

            let tcp_protocol = protocol.as_tcp();
            let remaining =
                retry_budget(timeout, start.elapsed()).ok_or(DomainError::QueryTimeout)?;

            let response = transport::create_transport(&tcp_protocol)
                .send(query_bytes, remaining)
                .await?;
            attempt = inspect(&tcp_protocol, response.bytes, response.protocol_used, query_id, start)?;
        }
    }

    Ok(attempt)
}

/// What is left of the attempt budget, `None` once it is spent.
fn retry_budget(timeout: Duration, elapsed: Duration) -> Option<Duration> {
    timeout.checked_sub(elapsed).filter(|left| !left.is_zero())
}

fn inspect(
    protocol: &DnsProtocol,
    bytes: Bytes,
    protocol_used: &'static str,
    query_id: u16,
    start: Instant,
) -> Result<QueryAttemptResult, DomainError> {
    if bytes.len() < DNS_HEADER_LEN {
        return Err(DomainError::InvalidDnsResponse(format!(
            "{} byte response from {}",
            bytes.len(),
            protocol
        )));
    }

    let response_id = u16::from_be_bytes([bytes[0], bytes[1]]);
    if response_id != query_id {
        return Err(DomainError::InvalidDnsResponse(format!(
            "ID mismatch from {}: sent {}, got {}",
            protocol, query_id, response_id
        )));
    }

    let message = match Message::from_vec(&bytes) {
        Ok(message) => Some(message),
        Err(e) => {
            debug!(server = %protocol, error = %e, "Upstream response does not decode");
            None
        }
    };

    Ok(QueryAttemptResult {
        bytes,
        message,
        server_addr: protocol.socket_addr(),
        protocol_used,
        latency_ms: start.elapsed().as_millis() as u64,
    })
}
