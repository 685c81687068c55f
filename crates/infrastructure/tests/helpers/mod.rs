#![allow(dead_code)]

pub mod dns_server_mock;
pub mod sinks;

pub use dns_server_mock::{MockBehavior, MockDnsServer};
pub use sinks::RecordingSink;
