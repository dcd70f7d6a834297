//! Realtime CLI - route and publish messages to pubsub shards

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "realtime", version, about = "Route messages to realtime pubsub shards")]
pub struct Cli {
    /// Pubsub service as name:port [env: REALTIME_SERVICE]
    #[arg(long, global = true)]
    pub service: Option<String>,

    /// Number of shard nodes [env: REALTIME_MAX_NODES]
    #[arg(long, global = true)]
    pub max_nodes: Option<usize>,

    /// Dial timeout in milliseconds [env: REALTIME_DIAL_TIMEOUT_MS]
    #[arg(long, global = true)]
    pub dial_timeout_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which shard an account maps to
    Resolve {
        /// Account ID
        account: String,
    },

    /// Publish a message to the shard owning an account
    Publish {
        /// Account ID
        account: String,

        /// Topic (repeatable)
        #[arg(short, long = "topic", required = true)]
        topics: Vec<String>,

        /// Payload as text
        #[arg(short, long, conflicts_with = "payload_hex")]
        payload: Option<String>,

        /// Payload as hex bytes
        #[arg(long)]
        payload_hex: Option<String>,
    },

    /// Run a shard node that logs and accepts every publish
    Serve {
        /// Listen address
        #[arg(short, long, default_value = "0.0.0.0:48883")]
        listen: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_cli(&cli);

    match cli.command {
        Commands::Resolve { account } => commands::resolve::handle(&account, &config),
        Commands::Publish {
            account,
            topics,
            payload,
            payload_hex,
        } => commands::publish::handle(&account, topics, payload, payload_hex, &config).await,
        Commands::Serve { listen } => commands::serve::handle(&listen).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publish() {
        let cli = Cli::try_parse_from([
            "realtime",
            "publish",
            "acct-42",
            "--topic",
            "a",
            "-t",
            "b",
            "--payload",
            "hi",
            "--max-nodes",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.max_nodes, Some(4));
        match cli.command {
            Commands::Publish {
                account,
                topics,
                payload,
                payload_hex,
            } => {
                assert_eq!(account, "acct-42");
                assert_eq!(topics, vec!["a", "b"]);
                assert_eq!(payload.as_deref(), Some("hi"));
                assert!(payload_hex.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_publish_requires_topic() {
        assert!(Cli::try_parse_from(["realtime", "publish", "acct-42"]).is_err());
    }

    #[test]
    fn test_payload_flags_conflict() {
        let result = Cli::try_parse_from([
            "realtime",
            "publish",
            "acct-42",
            "-t",
            "a",
            "--payload",
            "hi",
            "--payload-hex",
            "0102",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_resolve_with_service() {
        let cli =
            Cli::try_parse_from(["realtime", "resolve", "hello", "--service", "pubsub:7000"])
                .unwrap();
        assert_eq!(cli.service.as_deref(), Some("pubsub:7000"));
        assert!(matches!(cli.command, Commands::Resolve { .. }));
    }
}
