//! Publish command handler

use crate::config::Config;
use anyhow::{Context, Result};
use colored::Colorize;
use realtime_router::{RouterError, ShardRouter};

pub async fn handle(
    account: &str,
    topics: Vec<String>,
    payload: Option<String>,
    payload_hex: Option<String>,
    config: &Config,
) -> Result<()> {
    let payload = decode_payload(payload, payload_hex)?;
    let router = ShardRouter::new(config.router.clone())?;
    let shard = router.shard_for(account);

    println!("{} Publishing message...", "→".cyan().bold());
    println!("  Account:  {}", account.cyan());
    println!("  Topics:   {}", topics.join(", ").cyan());
    println!("  Payload:  {} bytes", payload.len().to_string().cyan());
    println!("  Shard:    {} ({})", shard.to_string().cyan(), router.address_of(shard).cyan());

    match router.send(account, topics, payload).await {
        Ok(()) => {
            println!("{} Message published", "✓".green().bold());
            Ok(())
        }
        Err(e @ RouterError::Connect { .. }) => {
            println!("{} {}", "✗".red().bold(), e.to_string().red());
            println!(
                "{} Make sure shard {} is running at {}",
                "→".dimmed(),
                shard,
                router.address_of(shard).dimmed()
            );
            Err(e.into())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), e.to_string().red());
            Err(e.into())
        }
    }
}

fn decode_payload(text: Option<String>, hex_bytes: Option<String>) -> Result<Vec<u8>> {
    match (text, hex_bytes) {
        (_, Some(h)) => hex::decode(h.trim_start_matches("0x")).context("Invalid --payload-hex"),
        (Some(t), None) => Ok(t.into_bytes()),
        (None, None) => Ok(Vec::new()),
    }
}
