use ferrous_dns64_domain::{DomainError, Nat64Prefix};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::rdata::AAAA;
use hickory_proto::rr::{RData, Record, RecordType};

/// TTL bound used when the original response has no SOA in its authority.
pub const DEFAULT_NS_TTL: u32 = 600;

/// An A record that could not be turned into AAAA.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub record: Record,
    pub error: DomainError,
}

#[derive(Debug, Clone, Default)]
pub struct RewriteSummary {
    pub synthesized: usize,
    pub passed_through: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Replaces the answers of `original` with AAAA records synthesized from
/// the A records in `replacement`.
///
/// The rcode becomes NOERROR and the authority section is cleared. Each
/// synthesized TTL is capped by the TTL of the original SOA (600 without
/// one). Records that are not A are copied unchanged.
pub fn rewrite(original: &mut Message, replacement: &Message, prefix: &Nat64Prefix) -> RewriteSummary {
    original.set_response_code(ResponseCode::NoError);

    let ns_ttl = soa_ttl(original.name_servers()).unwrap_or(DEFAULT_NS_TTL);

    let mut summary = RewriteSummary::default();
    let mut answers = Vec::with_capacity(replacement.answers().len());

    for record in replacement.answers() {
        if record.record_type() != RecordType::A {
            answers.push(record.clone());
            summary.passed_through += 1;
            continue;
        }

        match synthesize(record, ns_ttl, prefix) {
            Ok(aaaa) => {
                answers.push(aaaa);
                summary.synthesized += 1;
            }
            Err(error) => summary.skipped.push(SkippedRecord {
                record: record.clone(),
                error,
            }),
        }
    }

    original.take_answers();
    original.insert_answers(answers);
    original.take_name_servers();

    summary
}

/// By-value form of [`rewrite`].
pub fn rewritten(mut original: Message, replacement: &Message, prefix: &Nat64Prefix) -> Message {
    rewrite(&mut original, replacement, prefix);
    original
}

fn synthesize(record: &Record, ns_ttl: u32, prefix: &Nat64Prefix) -> Result<Record, DomainError> {
    let addr = match record.data() {
        RData::A(a) => prefix.embed_ipv4(a.0),
        _ => {
            return Err(DomainError::InvalidIpAddress(format!(
                "A record for {} has no IPv4 address",
                record.name()
            )))
        }
    };

    let mut aaaa = Record::from_rdata(
        record.name().clone(),
        record.ttl().min(ns_ttl),
        RData::AAAA(AAAA(addr)),
    );
    aaaa.set_dns_class(record.dns_class());
    Ok(aaaa)
}

// Several SOAs are not expected; the last one wins.
fn soa_ttl(authority: &[Record]) -> Option<u32> {
    authority
        .iter()
        .rev()
        .find(|r| r.record_type() == RecordType::SOA)
        .map(Record::ttl)
}
