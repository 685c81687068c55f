use ferrous_dns64_domain::ResponseClass;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};

/// Upper bound on CNAME hops followed inside one answer section.
const MAX_CNAME_CHAIN: usize = 16;

/// Classifies a tentative response.
///
/// NXDOMAIN wins over everything. A response whose answer section does not
/// answer the question is NODATA even when its rcode is an error, which keeps
/// SERVFAIL-with-no-answers on the NODATA path.
pub fn classify(response: &Message) -> ResponseClass {
    if response.response_code() == ResponseCode::NXDomain {
        return ResponseClass::NameError;
    }
    if !answers_question(response) {
        return ResponseClass::NoData;
    }
    if response.response_code() != ResponseCode::NoError {
        return ResponseClass::Other;
    }
    ResponseClass::NoError
}

fn answers_question(response: &Message) -> bool {
    let answers = response.answers();
    if answers.is_empty() {
        return false;
    }

    let Some(query) = response.queries().first() else {
        return true;
    };
    let query_type = query.query_type();
    if query_type == RecordType::ANY {
        return true;
    }

    let mut owner: Name = query.name().clone();
    for _ in 0..MAX_CNAME_CHAIN {
        if answers
            .iter()
            .any(|r| r.record_type() == query_type && r.name() == &owner)
        {
            return true;
        }

        let next = answers.iter().find_map(|r| match r.data() {
            RData::CNAME(target) if r.name() == &owner => Some(target.0.clone()),
            _ => None,
        });
        match next {
            Some(target) => owner = target,
            None => return false,
        }
    }
    false
}
