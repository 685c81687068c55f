//! TCP Transport for DNS queries (RFC 1035 §4.2.2, RFC 7766)
//!
//! Every message is framed by a two-byte big-endian length. Idle connections
//! are kept per upstream and reused.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use ferrous_dns64_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;
const MAX_IDLE_TCP_PER_HOST: usize = 2;

type TcpConnectionPool = DashMap<SocketAddr, Vec<TcpStream>>;

static TCP_POOL: LazyLock<TcpConnectionPool> = LazyLock::new(TcpConnectionPool::new);

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn take_pooled(&self) -> Option<TcpStream> {
        TCP_POOL.get_mut(&self.server_addr)?.pop()
    }

    fn return_to_pool(&self, stream: TcpStream) {
        let mut entry = TCP_POOL.entry(self.server_addr).or_default();
        if entry.len() < MAX_IDLE_TCP_PER_HOST {
            entry.push(stream);
        }
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }

    async fn connect_new(&self, timeout: Duration) -> Result<TcpStream, DomainError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| match e.kind() {
                io::ErrorKind::ConnectionReset => DomainError::TransportConnectionReset {
                    server: self.server_addr.to_string(),
                },
                _ => DomainError::TransportConnectionRefused {
                    server: self.server_addr.to_string(),
                },
            })?;

        stream.set_nodelay(true).map_err(|e| {
            DomainError::UpstreamFailure(format!(
                "Failed to set TCP_NODELAY on {}: {}",
                self.server_addr, e
            ))
        })?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let mut stream = match self.take_pooled() {
            Some(s) => s,
            None => self.connect_new(timeout).await?,
        };

        let send_result =
            tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes)).await;

        // A pooled stream may have been closed by the server while idle.
        let mut stream = match send_result {
            Ok(Ok(())) => stream,
            _ => {
                let mut fresh = self.connect_new(timeout).await?;
                tokio::time::timeout(timeout, send_with_length_prefix(&mut fresh, message_bytes))
                    .await
                    .map_err(|_| self.timeout_error())??;
                fresh
            }
        };

        debug!(
            server = %self.server_addr,
            message_len = message_bytes.len(),
            "TCP query sent"
        );

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| self.timeout_error())??;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        self.return_to_pool(stream);

        Ok(TransportResponse {
            bytes: Bytes::from(response_bytes),
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::DeliveryFailed(format!(
            "Message too large for TCP framing: {} bytes",
            message_bytes.len()
        ))
    })?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| DomainError::DeliveryFailed(format!("Failed to write length prefix: {}", e)))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| DomainError::DeliveryFailed(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::DeliveryFailed(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

pub async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(|e| {
        DomainError::InvalidDnsResponse(format!("Failed to read message length: {}", e))
    })?;

    let message_len = u16::from_be_bytes(len_buf) as usize;

    if message_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Message too large: {} bytes (max {})",
            message_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut message = vec![0u8; message_len];
    stream.read_exact(&mut message).await.map_err(|e| {
        DomainError::InvalidDnsResponse(format!("Failed to read message body: {}", e))
    })?;

    Ok(message)
}
