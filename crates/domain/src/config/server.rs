use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// `::` accepts both families on a dual-stack host; DNS64 only
    /// applies to clients that reach us over IPv6.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            bind_address: default_bind_address(),
            num_workers: default_num_workers(),
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_bind_address() -> String {
    "::".to_string()
}

fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
