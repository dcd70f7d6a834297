//! Resolve command handler

use crate::config::Config;
use anyhow::Result;
use colored::Colorize;

pub fn handle(account: &str, config: &Config) -> Result<()> {
    let shards = config.router.validate()?;
    let shard = shards.shard_for(account);

    println!("{} Account {}", "→".cyan().bold(), account.cyan());
    println!("  Service:  {}", shards.service().to_string().cyan());
    println!("  Shards:   {}", shards.shard_count().to_string().cyan());
    println!("  Shard:    {}", shard.to_string().green().bold());
    println!("  Address:  {}", shards.address_of(shard).green());

    Ok(())
}
