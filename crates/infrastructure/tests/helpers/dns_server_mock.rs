use ferrous_dns64_infrastructure::dns::MessageBuilder;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use ferrous_dns64_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// How the mock answers every query it receives.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Answers A and AAAA questions with these addresses, anything else
    /// with NODATA.
    Answer {
        a: Vec<Ipv4Addr>,
        aaaa: Vec<Ipv6Addr>,
    },
    /// Empty answer with this rcode.
    Rcode(ResponseCode),
    /// TC bit over UDP; the full answer is served over TCP on the same port.
    TruncateUdp { a: Vec<Ipv4Addr> },
    /// Echoes the ID followed by bytes that do not decode.
    Garbage,
    /// Never answers.
    Silent,
}

impl MockBehavior {
    pub fn a(ip: &str) -> Self {
        Self::Answer {
            a: vec![ip.parse().unwrap()],
            aaaa: vec![],
        }
    }
}

pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let received = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        if let MockBehavior::TruncateUdp { a } = &behavior {
            let listener = TcpListener::bind(addr).await.unwrap();
            let full = MockBehavior::Answer {
                a: a.clone(),
                aaaa: vec![],
            };
            tokio::spawn(serve_tcp(listener, full));
        }

        let counter = received.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = build_response(&buf[..len], &behavior, true) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve_tcp(listener: TcpListener, behavior: MockBehavior) {
    while let Ok((mut stream, _)) = listener.accept().await {
        let behavior = behavior.clone();
        tokio::spawn(async move {
            while let Ok(query) = read_with_length_prefix(&mut stream).await {
                let Some(response) = build_response(&query, &behavior, false) else {
                    break;
                };
                if send_with_length_prefix(&mut stream, &response).await.is_err() {
                    break;
                }
            }
        });
    }
}

pub fn build_response(query: &[u8], behavior: &MockBehavior, udp: bool) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    for q in request.queries() {
        response.add_query(q.clone());
    }
    let question = request.queries().first()?.clone();

    match behavior {
        MockBehavior::Answer { a, aaaa } => match question.query_type() {
            RecordType::A => {
                for ip in a {
                    response.add_answer(Record::from_rdata(
                        question.name().clone(),
                        60,
                        RData::A(A(*ip)),
                    ));
                }
            }
            RecordType::AAAA => {
                for ip in aaaa {
                    response.add_answer(Record::from_rdata(
                        question.name().clone(),
                        60,
                        RData::AAAA(AAAA(*ip)),
                    ));
                }
            }
            _ => {}
        },
        MockBehavior::Rcode(code) => {
            response.set_response_code(*code);
        }
        MockBehavior::TruncateUdp { a } => {
            if udp {
                response.set_truncated(true);
            } else {
                for ip in a {
                    response.add_answer(Record::from_rdata(
                        question.name().clone(),
                        60,
                        RData::A(A(*ip)),
                    ));
                }
            }
        }
        MockBehavior::Garbage => {
            let mut bytes = request.id().to_be_bytes().to_vec();
            // QR set, one question announced, none present.
            bytes.extend_from_slice(&[0x81, 0x80, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0xff]);
            return Some(bytes);
        }
        MockBehavior::Silent => return None,
    }

    MessageBuilder::serialize_message(&response).ok()
}
