use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use crate::nat64_prefix::{Nat64Prefix, WELL_KNOWN_PREFIX};
use crate::DnsProtocol;

/// What to send when the A lookup for a synthesized answer fails.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamFailurePolicy {
    /// Answer SERVFAIL.
    #[default]
    #[serde(rename = "servfail")]
    ServFail,

    /// Deliver the untranslated response.
    PassThrough,
}

impl UpstreamFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServFail => "servfail",
            Self::PassThrough => "pass_through",
        }
    }
}

/// `[dns64]` section as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dns64Config {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Synthesize even when AAAA records exist (RFC 6147 §5.1.1 exclusion).
    #[serde(default)]
    pub translate_all: bool,

    /// Dedicated servers for the A lookup. Empty means the lookup goes
    /// through the same resolvers that answer client queries.
    #[serde(default)]
    pub upstream: Vec<String>,

    #[serde(default)]
    pub on_upstream_failure: UpstreamFailurePolicy,
}

impl Default for Dns64Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            translate_all: false,
            upstream: Vec::new(),
            on_upstream_failure: UpstreamFailurePolicy::default(),
        }
    }
}

fn default_prefix() -> String {
    WELL_KNOWN_PREFIX.to_string()
}

/// Where the secondary A lookup is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTarget {
    /// Back through the server's own downstream handler.
    Native,
    /// Directly to these servers, tried in order.
    Proxy(Vec<DnsProtocol>),
}

/// Validated, immutable DNS64 settings shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dns64Settings {
    pub prefix: Nat64Prefix,
    pub translate_all: bool,
    pub lookup_target: LookupTarget,
    pub failure_policy: UpstreamFailurePolicy,
}

impl Dns64Settings {
    pub fn new(prefix: Nat64Prefix) -> Self {
        Self {
            prefix,
            translate_all: false,
            lookup_target: LookupTarget::Native,
            failure_policy: UpstreamFailurePolicy::default(),
        }
    }

    pub fn with_translate_all(mut self, translate_all: bool) -> Self {
        self.translate_all = translate_all;
        self
    }

    pub fn with_lookup_target(mut self, target: LookupTarget) -> Self {
        self.lookup_target = target;
        self
    }

    pub fn with_failure_policy(mut self, policy: UpstreamFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Validates the `[dns64]` section. Any error here must stop startup.
    pub fn from_config(config: &Dns64Config) -> Result<Self, ConfigError> {
        let prefix: Nat64Prefix = config.prefix.parse()?;

        let lookup_target = if config.upstream.is_empty() {
            LookupTarget::Native
        } else {
            let servers = config
                .upstream
                .iter()
                .map(|s| s.parse::<DnsProtocol>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ConfigError::Validation(format!("dns64 upstream: {}", e)))?;
            LookupTarget::Proxy(servers)
        };

        Ok(Self::new(prefix)
            .with_translate_all(config.translate_all)
            .with_lookup_target(lookup_target)
            .with_failure_policy(config.on_upstream_failure))
    }
}

impl Default for Dns64Settings {
    fn default() -> Self {
        Self::new(Nat64Prefix::well_known())
    }
}
