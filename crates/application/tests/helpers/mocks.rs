use async_trait::async_trait;
use ferrous_dns64_application::ports::{
    HandlerResponse, QueryHandler, ResponseSink, UpstreamLookup,
};
use ferrous_dns64_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::rr::Name;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub struct MockUpstreamLookup {
    result: Result<Message, DomainError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    names: Mutex<Vec<Name>>,
}

impl MockUpstreamLookup {
    pub fn answering(response: Message) -> Self {
        Self::with_result(Ok(response))
    }

    pub fn failing(error: DomainError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<Message, DomainError>) -> Self {
        Self {
            result,
            delay: None,
            calls: AtomicUsize::new(0),
            names: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn looked_up(&self) -> Vec<Name> {
        self.names.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamLookup for MockUpstreamLookup {
    async fn lookup_a(&self, name: &Name, _deadline: Instant) -> Result<Message, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names.lock().unwrap().push(name.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Debug, Clone)]
pub enum Delivery {
    Message(Message),
    Raw(Vec<u8>),
}

/// Sink that records every delivery; clones share the record.
#[derive(Clone, Default)]
pub struct RecordingSink {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// The single delivered message; panics on anything else.
    pub fn only_message(&self) -> Message {
        let deliveries = self.deliveries();
        assert_eq!(deliveries.len(), 1, "expected exactly one delivery");
        match &deliveries[0] {
            Delivery::Message(msg) => msg.clone(),
            Delivery::Raw(_) => panic!("expected a message, got raw bytes"),
        }
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        self.deliveries
            .lock()
            .unwrap()
            .push(Delivery::Message(response));
        Ok(())
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), DomainError> {
        self.deliveries
            .lock()
            .unwrap()
            .push(Delivery::Raw(bytes.to_vec()));
        Ok(())
    }
}

pub struct MockQueryHandler {
    result: Result<HandlerResponse, DomainError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockQueryHandler {
    pub fn answering(response: Message) -> Self {
        Self::with_result(Ok(HandlerResponse::Message(response)))
    }

    pub fn raw(bytes: Vec<u8>) -> Self {
        Self::with_result(Ok(HandlerResponse::Raw(bytes)))
    }

    pub fn failing(error: DomainError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<HandlerResponse, DomainError>) -> Self {
        Self {
            result,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryHandler for MockQueryHandler {
    async fn handle(
        &self,
        _request: &Message,
        _deadline: Instant,
    ) -> Result<HandlerResponse, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}
