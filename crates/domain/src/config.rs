pub mod dns64;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod upstream;

pub use dns64::{Dns64Config, Dns64Settings, LookupTarget, UpstreamFailurePolicy};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
