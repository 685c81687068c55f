use ferrous_dns64_application::ports::UpstreamLookup;
use ferrous_dns64_application::use_cases::{Dns64UseCase, HandleDnsQueryUseCase};
use ferrous_dns64_domain::{Config, LookupTarget};
use ferrous_dns64_infrastructure::dns::{
    ChainLookup, DnsServerHandler, ForwardingQueryHandler, ProxyLookup, UpstreamForwarder,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span};

pub struct DnsServices {
    pub handler: DnsServerHandler,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let servers = config.upstream_servers()?;
        info!(servers = servers.len(), "Initializing upstream forwarding");

        let query_handler = Arc::new(ForwardingQueryHandler::new(Arc::new(
            UpstreamForwarder::new(servers),
        )));

        let settings = config.dns64_settings()?;
        let lookup: Arc<dyn UpstreamLookup> = match &settings.lookup_target {
            LookupTarget::Native => Arc::new(ChainLookup::new(query_handler.clone())),
            LookupTarget::Proxy(servers) => {
                Arc::new(ProxyLookup::new(UpstreamForwarder::new(servers.clone())))
            }
        };

        info!(
            prefix = %settings.prefix,
            translate_all = settings.translate_all,
            lookup = lookup.name(),
            on_upstream_failure = settings.failure_policy.as_str(),
            "DNS64 enabled"
        );

        let span = info_span!("dns64", prefix = %settings.prefix);
        let dns64 = Dns64UseCase::new(Arc::new(settings), lookup).with_span(span);
        let use_case = HandleDnsQueryUseCase::new(
            query_handler,
            dns64,
            Duration::from_secs(config.upstream.query_timeout),
        );

        Ok(Self {
            handler: DnsServerHandler::new(Arc::new(use_case)),
        })
    }
}
