//! Response sinks bound to a client connection.

use super::forwarding::MessageBuilder;
use super::transport::tcp::send_with_length_prefix;
use async_trait::async_trait;
use ferrous_dns64_application::ports::ResponseSink;
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::debug;

pub struct UdpResponseSink {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
    max_payload: usize,
}

impl UdpResponseSink {
    /// `max_payload` is the size the client advertised (512 without EDNS).
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr, max_payload: u16) -> Self {
        Self {
            socket,
            peer,
            max_payload: usize::from(max_payload),
        }
    }

    async fn send(&self, bytes: &[u8]) -> Result<(), DomainError> {
        self.socket
            .send_to(bytes, self.peer)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::DeliveryFailed(format!("UDP send to {}: {}", self.peer, e)))
    }
}

#[async_trait]
impl ResponseSink for UdpResponseSink {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        let mut bytes = MessageBuilder::serialize_message(&response)?;

        if bytes.len() > self.max_payload {
            debug!(
                client = %self.peer,
                size = bytes.len(),
                max_payload = self.max_payload,
                "Response exceeds UDP payload, truncating"
            );
            bytes = MessageBuilder::serialize_message(&response.truncate())?;
        }

        self.send(&bytes).await
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), DomainError> {
        self.send(bytes).await
    }
}

/// Writes length-prefixed responses to a shared TCP write half.
pub struct TcpResponseSink<W> {
    writer: Arc<Mutex<W>>,
}

impl<W> TcpResponseSink<W> {
    pub fn new(writer: Arc<Mutex<W>>) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl<W> ResponseSink for TcpResponseSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        let bytes = MessageBuilder::serialize_message(&response)?;
        self.write_raw(&bytes).await
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), DomainError> {
        let mut writer = self.writer.lock().await;
        send_with_length_prefix(&mut *writer, bytes).await
    }
}
