use ferrous_dns64_application::use_cases::RequestContext;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, SOA};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;

pub const V6_CLIENT: &str = "[2001:db8::10]:40000";
pub const V4_CLIENT: &str = "192.0.2.10:40000";
pub const MAPPED_CLIENT: &str = "[::ffff:192.0.2.10]:40000";

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn client(addr: &str) -> SocketAddr {
    addr.parse().unwrap()
}

pub fn query(qname: &str, qtype: RecordType) -> Message {
    let mut msg = Message::new(0x1234, MessageType::Query, OpCode::Query);
    msg.set_recursion_desired(true);
    msg.add_query(Query::query(name(qname), qtype));
    msg
}

pub fn query_with_class(qname: &str, qtype: RecordType, class: DNSClass) -> Message {
    let mut q = Query::query(name(qname), qtype);
    q.set_query_class(class);
    let mut msg = Message::new(0x1234, MessageType::Query, OpCode::Query);
    msg.add_query(q);
    msg
}

/// Response to `qname`/`qtype` with the given rcode and no records.
pub fn response(qname: &str, qtype: RecordType, rcode: ResponseCode) -> Message {
    let mut msg = Message::new(0x1234, MessageType::Response, OpCode::Query);
    msg.add_query(Query::query(name(qname), qtype));
    msg.set_response_code(rcode);
    msg
}

pub fn a_record(owner: &str, ip: &str, ttl: u32) -> Record {
    let ip: Ipv4Addr = ip.parse().unwrap();
    Record::from_rdata(name(owner), ttl, RData::A(A(ip)))
}

pub fn aaaa_record(owner: &str, ip: &str, ttl: u32) -> Record {
    let ip: Ipv6Addr = ip.parse().unwrap();
    Record::from_rdata(name(owner), ttl, RData::AAAA(AAAA(ip)))
}

pub fn cname_record(owner: &str, target: &str, ttl: u32) -> Record {
    Record::from_rdata(name(owner), ttl, RData::CNAME(CNAME(name(target))))
}

pub fn soa_record(zone: &str, ttl: u32) -> Record {
    let mname = name(&format!("ns1.{}", zone));
    let rname = name(&format!("hostmaster.{}", zone));
    let soa = SOA::new(mname, rname, 1, 3600, 900, 604800, 60);
    Record::from_rdata(name(zone), ttl, RData::SOA(soa))
}

/// A/IN answer as returned by the secondary lookup.
pub fn a_answer(qname: &str, records: Vec<Record>) -> Message {
    let mut msg = response(qname, RecordType::A, ResponseCode::NoError);
    for record in records {
        msg.add_answer(record);
    }
    msg
}

pub fn context(qname: &str, qtype: RecordType, peer: &str) -> RequestContext {
    context_with_deadline(qname, qtype, peer, Duration::from_secs(5))
}

pub fn context_with_deadline(
    qname: &str,
    qtype: RecordType,
    peer: &str,
    budget: Duration,
) -> RequestContext {
    RequestContext::from_request(&query(qname, qtype), client(peer), Instant::now() + budget)
        .unwrap()
}

pub fn aaaa_addresses(msg: &Message) -> Vec<Ipv6Addr> {
    msg.answers()
        .iter()
        .filter_map(|r| match r.data() {
            RData::AAAA(aaaa) => Some(aaaa.0),
            _ => None,
        })
        .collect()
}
