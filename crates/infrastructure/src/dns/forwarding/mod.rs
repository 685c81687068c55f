pub mod forwarder;
pub mod message_builder;
pub mod query;

pub use forwarder::{RcodePolicy, UpstreamForwarder, DEFAULT_ATTEMPT_TIMEOUT};
pub use message_builder::MessageBuilder;
pub use query::{query_server, QueryAttemptResult};
