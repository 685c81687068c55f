use serde::{Deserialize, Serialize};

/// Resolvers that answer client queries before DNS64 sees the response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Per-query deadline in seconds, covering the DNS64 A lookup as well.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_query_timeout() -> u64 {
    5
}
