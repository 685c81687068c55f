mod handle_dns_query;
mod response;

pub use handle_dns_query::HandleDnsQueryUseCase;
pub use response::error_response;
