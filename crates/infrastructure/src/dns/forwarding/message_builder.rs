//! DNS Message Builder
//!
//! Builds and encodes the wire-format messages sent upstream.

use ferrous_dns64_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Recursive single-question query with a random ID.
    pub fn query(name: &Name, record_type: RecordType) -> Message {
        let mut query = Query::query(name.clone(), record_type);
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);
        message
    }

    /// Same as [`MessageBuilder::query`], encoded. Returns the ID with the bytes.
    pub fn build_query(name: &Name, record_type: RecordType) -> Result<(u16, Vec<u8>), DomainError> {
        let message = Self::query(name, record_type);
        let bytes = Self::serialize_message(&message)?;
        Ok((message.id(), bytes))
    }

    /// Encodes a client query under a fresh ID so upstream replies can be
    /// matched without trusting the client's choice.
    pub fn reencode(request: &Message) -> Result<(u16, Vec<u8>), DomainError> {
        let mut message = request.clone();
        let id = fastrand::u16(..);
        Self::set_id(&mut message, id);
        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    /// Replaces the message ID, keeping every other header flag.
    pub fn set_id(message: &mut Message, id: u16) {
        let mut header = *message.header();
        header.set_id(id);
        message.set_header(header);
    }

    /// Serialize a DNS message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_build_query_sets_rd_and_question() {
        let name = Name::from_str("example.com.").unwrap();
        let (id, bytes) = MessageBuilder::build_query(&name, RecordType::A).unwrap();

        let parsed = Message::from_vec(&bytes).unwrap();
        assert_eq!(parsed.id(), id);
        assert!(parsed.recursion_desired());
        assert_eq!(parsed.queries().len(), 1);
        assert_eq!(parsed.queries()[0].query_type(), RecordType::A);
        assert_eq!(parsed.queries()[0].query_class(), DNSClass::IN);
    }

    #[test]
    fn test_reencode_keeps_question() {
        let name = Name::from_str("example.com.").unwrap();
        let request = MessageBuilder::query(&name, RecordType::AAAA);

        let (id, bytes) = MessageBuilder::reencode(&request).unwrap();
        let parsed = Message::from_vec(&bytes).unwrap();

        assert_eq!(parsed.id(), id);
        assert_eq!(parsed.queries(), request.queries());
    }

    #[test]
    fn test_set_id_keeps_header_flags() {
        let name = Name::from_str("example.com.").unwrap();
        let mut message = MessageBuilder::query(&name, RecordType::AAAA);

        MessageBuilder::set_id(&mut message, 0xbeef);

        assert_eq!(message.id(), 0xbeef);
        assert!(message.recursion_desired());
        assert_eq!(message.message_type(), MessageType::Query);
        assert_eq!(message.queries().len(), 1);
    }
}
