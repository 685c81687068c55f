use ferrous_dns64_infrastructure::dns::server::DnsServerHandler;
use ferrous_dns64_infrastructure::dns::transport::tcp::read_with_length_prefix;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Idle TCP connections are closed after this long (RFC 7766 §6.2.3).
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn start_dns_server(
    socket_addr: SocketAddr,
    handler: DnsServerHandler,
    num_workers: usize,
) -> anyhow::Result<()> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    info!(bind_address = %socket_addr, num_workers, "Starting DNS server with SO_REUSEPORT");

    let handler = Arc::new(handler);
    let mut join_set: JoinSet<()> = JoinSet::new();

    for i in 0..num_workers {
        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        join_set.spawn(run_udp_worker(udp_socket, handler.clone(), i));

        let tcp_listener = create_tcp_listener(domain, socket_addr)?;
        join_set.spawn(run_tcp_worker(tcp_listener, handler.clone(), i));
    }

    info!("DNS server ready: {} workers on {}", num_workers, socket_addr);

    while join_set.join_next().await.is_some() {}
    Ok(())
}

async fn run_udp_worker(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>, worker_id: usize) {
    let mut recv_buf = [0u8; 4096];

    loop {
        match socket.recv_from(&mut recv_buf).await {
            Ok((n, from)) => {
                let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
                let handler = handler.clone();
                let socket = socket.clone();
                tokio::spawn(async move {
                    handler.handle_udp(&query, from, socket).await;
                });
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!(worker = worker_id, error = %e, "UDP recv error");
            }
        }
    }
}

async fn run_tcp_worker(listener: TcpListener, handler: Arc<DnsServerHandler>, worker_id: usize) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tokio::spawn(serve_tcp_connection(stream, peer, handler.clone()));
            }
            Err(e) => {
                error!(worker = worker_id, error = %e, "TCP accept error");
            }
        }
    }
}

/// One connection may carry several queries; each is answered independently.
async fn serve_tcp_connection(stream: TcpStream, peer: SocketAddr, handler: Arc<DnsServerHandler>) {
    let (mut reader, writer) = stream.into_split();
    let writer = Arc::new(Mutex::new(writer));

    loop {
        let query = match tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut reader)).await {
            Ok(Ok(query)) => query,
            Ok(Err(e)) => {
                debug!(client = %peer, error = %e, "TCP connection closed");
                break;
            }
            Err(_) => {
                debug!(client = %peer, "TCP connection idle, closing");
                break;
            }
        };

        let handler = handler.clone();
        let writer = writer.clone();
        tokio::spawn(async move {
            handler.handle_tcp(&query, peer, writer).await;
        });
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
