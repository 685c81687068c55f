use async_trait::async_trait;
use ferrous_dns64_application::ports::ResponseSink;
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<Message>>>,
    raw: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    pub fn raw(&self) -> Vec<Vec<u8>> {
        self.raw.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        self.messages.lock().unwrap().push(response);
        Ok(())
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), DomainError> {
        self.raw.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }
}
