use super::context::RequestContext;
use ferrous_dns64_domain::{Dns64Settings, ResponseClass};
use hickory_proto::op::Message;
use hickory_proto::rr::{DNSClass, RecordType};

/// Decides whether `response` gets synthesized AAAA answers.
///
/// Only IPv6 clients asking AAAA/IN qualify. NXDOMAIN and other errors are
/// left alone; NODATA always translates; a positive answer translates only
/// when it carries no AAAA or `translate_all` is set.
pub fn should_translate(
    ctx: &RequestContext,
    response: &Message,
    class: ResponseClass,
    settings: &Dns64Settings,
) -> bool {
    if !ctx.family.is_ipv6() {
        return false;
    }
    if ctx.query_type != RecordType::AAAA || ctx.query_class != DNSClass::IN {
        return false;
    }

    match class {
        ResponseClass::NameError | ResponseClass::Other => false,
        ResponseClass::NoData => true,
        ResponseClass::NoError => settings.translate_all || !has_aaaa(response),
    }
}

pub(crate) fn has_aaaa(response: &Message) -> bool {
    response
        .answers()
        .iter()
        .any(|r| r.record_type() == RecordType::AAAA)
}
