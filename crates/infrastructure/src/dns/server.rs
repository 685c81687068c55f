use super::sink::{TcpResponseSink, UdpResponseSink};
use ferrous_dns64_application::ports::ResponseSink;
use ferrous_dns64_application::use_cases::HandleDnsQueryUseCase;
use hickory_proto::op::{Message, MessageType};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Entry point from the listeners: decodes client bytes and dispatches them.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Undecodable input is dropped: without an ID there is nothing to answer.
    pub async fn handle_bytes<S: ResponseSink>(&self, bytes: &[u8], client: SocketAddr, sink: S) {
        if let Some(request) = decode_query(bytes, client) {
            self.dispatch(request, client, sink).await;
        }
    }

    pub async fn handle_udp(&self, bytes: &[u8], client: SocketAddr, socket: Arc<UdpSocket>) {
        if let Some(request) = decode_query(bytes, client) {
            let sink = UdpResponseSink::new(socket, client, request.max_payload());
            self.dispatch(request, client, sink).await;
        }
    }

    pub async fn handle_tcp<W>(&self, bytes: &[u8], client: SocketAddr, writer: Arc<Mutex<W>>)
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.handle_bytes(bytes, client, TcpResponseSink::new(writer))
            .await;
    }

    async fn dispatch<S: ResponseSink>(&self, request: Message, client: SocketAddr, sink: S) {
        if let Err(e) = self.use_case.execute(&request, client, sink).await {
            warn!(client = %client, id = request.id(), error = %e, "Failed to deliver response");
        }
    }
}

fn decode_query(bytes: &[u8], client: SocketAddr) -> Option<Message> {
    let request = match Message::from_vec(bytes) {
        Ok(request) => request,
        Err(e) => {
            debug!(client = %client, len = bytes.len(), error = %e, "Dropping undecodable query");
            return None;
        }
    };

    if request.message_type() != MessageType::Query {
        debug!(client = %client, id = request.id(), "Dropping non-query message");
        return None;
    }

    Some(request)
}
