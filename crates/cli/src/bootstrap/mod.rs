use ferrous_dns64_domain::{CliOverrides, Config};
use tracing::info;

/// Loads and validates the configuration. Any error stops startup.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = config.logging.level.clone();
        if !filter.contains("hickory_proto") {
            filter.push_str(",hickory_proto=warn");
        }
        tracing_subscriber::EnvFilter::new(filter)
    });

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }

    if let Some(path) = Config::get_config_path() {
        info!(path = %path, "Configuration file found");
    }
}
