//! CLI configuration: flags over environment over defaults

use crate::Cli;
use realtime_router::RouterConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub router: RouterConfig,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut router = RouterConfig::from_env();

        if let Some(service) = &cli.service {
            router.service = service.clone();
        }
        if let Some(max_nodes) = cli.max_nodes {
            router.max_nodes = max_nodes;
        }
        if let Some(ms) = cli.dial_timeout_ms {
            router.dial_timeout = Duration::from_millis(ms);
        }

        Self { router }
    }
}
