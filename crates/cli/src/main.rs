use clap::Parser;
use ferrous_dns64_domain::CliOverrides;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-dns64")]
#[command(version = "0.1.0")]
#[command(about = "Ferrous DNS64 - AAAA synthesis for IPv6-only clients behind NAT64")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// NAT64 prefix, e.g. 64:ff9b::/96
    #[arg(short = 'p', long)]
    prefix: Option<String>,

    /// Synthesize AAAA records even when real ones exist
    #[arg(long)]
    translate_all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        prefix: cli.prefix.clone(),
        translate_all: cli.translate_all,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous DNS64 v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config)?;
    let bind_addr = config.bind_socket_addr()?;

    tokio::select! {
        result = server::start_dns_server(bind_addr, dns_services.handler, config.server.num_workers) => {
            if let Err(e) = result {
                error!(error = %e, "DNS server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
