mod query_handler;
mod response_sink;
mod upstream_lookup;

pub use query_handler::{HandlerResponse, QueryHandler};
pub use response_sink::ResponseSink;
pub use upstream_lookup::UpstreamLookup;
