use serde::{Deserialize, Serialize};

use super::dns64::{Dns64Config, Dns64Settings};
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::DnsProtocol;
use std::net::{IpAddr, SocketAddr};

const LOCAL_CONFIG_PATH: &str = "ferrous-dns64.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-dns64/config.toml";

/// Main configuration structure for Ferrous DNS64
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address, workers)
    #[serde(default)]
    pub server: ServerConfig,

    /// Resolvers answering client queries
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Synthesis configuration
    #[serde(default)]
    pub dns64: Dns64Config,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-dns64.toml in current directory
    /// 3. /etc/ferrous-dns64/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(prefix) = overrides.prefix {
            self.dns64.prefix = prefix;
        }
        if overrides.translate_all {
            self.dns64.translate_all = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        self.bind_socket_addr()?;

        if self.server.num_workers == 0 {
            return Err(ConfigError::Validation(
                "num_workers must be at least 1".to_string(),
            ));
        }

        if self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        if self.upstream.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "query_timeout must be at least 1 second".to_string(),
            ));
        }

        for server in &self.upstream.servers {
            server
                .parse::<DnsProtocol>()
                .map_err(|e| ConfigError::Validation(format!("upstream: {}", e)))?;
        }

        self.dns64_settings().map(|_| ())
    }

    /// Listening address built from `bind_address` and `dns_port`.
    pub fn bind_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.bind_address.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "bind_address '{}' is not an IP address",
                self.server.bind_address
            ))
        })?;
        Ok(SocketAddr::new(ip, self.server.dns_port))
    }

    pub fn dns64_settings(&self) -> Result<Dns64Settings, ConfigError> {
        Dns64Settings::from_config(&self.dns64)
    }

    pub fn upstream_servers(&self) -> Result<Vec<DnsProtocol>, ConfigError> {
        self.upstream
            .servers
            .iter()
            .map(|s| {
                s.parse::<DnsProtocol>()
                    .map_err(|e| ConfigError::Validation(format!("upstream: {}", e)))
            })
            .collect()
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub prefix: Option<String>,
    pub translate_all: bool,
}
