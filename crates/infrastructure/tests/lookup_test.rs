mod helpers;

use async_trait::async_trait;
use ferrous_dns64_application::ports::{HandlerResponse, QueryHandler, UpstreamLookup};
use ferrous_dns64_domain::{DnsProtocol, DomainError};
use ferrous_dns64_infrastructure::dns::{
    ChainLookup, ForwardingQueryHandler, ProxyLookup, UpstreamForwarder,
};
use helpers::{MockBehavior, MockDnsServer};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn forwarder_for(servers: &[&MockDnsServer]) -> UpstreamForwarder {
    UpstreamForwarder::new(
        servers
            .iter()
            .map(|s| DnsProtocol::Udp { addr: s.addr() })
            .collect(),
    )
}

fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(2)
}

fn name() -> Name {
    Name::from_str("ipv4only.example.").unwrap()
}

fn addresses(msg: &Message) -> Vec<Ipv4Addr> {
    msg.answers()
        .iter()
        .filter_map(|r| match r.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_proxy_lookup_returns_a_answer() {
    let server = MockDnsServer::start(MockBehavior::a("192.0.0.170")).await;
    let lookup = ProxyLookup::new(forwarder_for(&[&server]));

    let response = lookup.lookup_a(&name(), deadline()).await.unwrap();

    assert_eq!(response.queries()[0].query_type(), RecordType::A);
    assert_eq!(addresses(&response), vec![Ipv4Addr::new(192, 0, 0, 170)]);
    assert_eq!(lookup.name(), "proxy");
}

#[tokio::test]
async fn test_proxy_lookup_skips_servfail_upstream() {
    let broken = MockDnsServer::start(MockBehavior::Rcode(ResponseCode::ServFail)).await;
    let live = MockDnsServer::start(MockBehavior::a("192.0.0.171")).await;
    let lookup = ProxyLookup::new(forwarder_for(&[&broken, &live]));

    let response = lookup.lookup_a(&name(), deadline()).await.unwrap();

    assert_eq!(addresses(&response), vec![Ipv4Addr::new(192, 0, 0, 171)]);
    assert_eq!(broken.received(), 1);
}

#[tokio::test]
async fn test_proxy_lookup_undecodable_is_error() {
    let server = MockDnsServer::start(MockBehavior::Garbage).await;
    let lookup = ProxyLookup::new(forwarder_for(&[&server]));

    let result = lookup.lookup_a(&name(), deadline()).await;

    assert!(matches!(result, Err(DomainError::InvalidDnsResponse(_))));
}

#[tokio::test]
async fn test_chain_lookup_goes_through_handler() {
    let server = MockDnsServer::start(MockBehavior::a("192.0.2.44")).await;
    let handler = Arc::new(ForwardingQueryHandler::new(Arc::new(forwarder_for(&[&server]))));
    let lookup = ChainLookup::new(handler);

    let response = lookup.lookup_a(&name(), deadline()).await.unwrap();

    assert_eq!(addresses(&response), vec![Ipv4Addr::new(192, 0, 2, 44)]);
    assert_eq!(lookup.name(), "native");
}

struct RawHandler;

#[async_trait]
impl QueryHandler for RawHandler {
    async fn handle(
        &self,
        _request: &Message,
        _deadline: Instant,
    ) -> Result<HandlerResponse, DomainError> {
        Ok(HandlerResponse::Raw(vec![0; 12]))
    }
}

#[tokio::test]
async fn test_chain_lookup_raw_response_is_error() {
    let lookup = ChainLookup::new(Arc::new(RawHandler));

    let result = lookup.lookup_a(&name(), deadline()).await;

    assert!(matches!(result, Err(DomainError::InvalidDnsResponse(_))));
}
