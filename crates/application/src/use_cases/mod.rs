pub mod dns;
pub mod dns64;

pub use dns::HandleDnsQueryUseCase;
pub use dns64::{Dns64Outcome, Dns64UseCase, Dns64Writer, RequestContext};
