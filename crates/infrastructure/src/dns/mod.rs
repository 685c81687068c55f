pub mod forwarding;
pub mod handler;
pub mod lookup;
pub mod server;
pub mod sink;
pub mod transport;

pub use forwarding::{MessageBuilder, RcodePolicy, UpstreamForwarder};
pub use handler::ForwardingQueryHandler;
pub use lookup::{ChainLookup, ProxyLookup};
pub use server::DnsServerHandler;
pub use sink::{TcpResponseSink, UdpResponseSink};
