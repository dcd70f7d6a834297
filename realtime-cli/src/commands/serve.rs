//! Serve command handler: a shard node that logs what it receives

use anyhow::Result;
use async_trait::async_trait;
use realtime_rpc::{PublishHandler, PublishMessage, PubsubServer};
use std::sync::Arc;
use tracing::info;

struct LoggingNode;

#[async_trait]
impl PublishHandler for LoggingNode {
    async fn handle_publish(&self, message: PublishMessage) -> std::result::Result<(), String> {
        info!(
            account_id = %message.account_id,
            topics = ?message.topics,
            payload_len = message.payload.len(),
            "Received publish"
        );
        Ok(())
    }
}

pub async fn handle(listen: &str) -> Result<()> {
    let server = PubsubServer::bind(listen, Arc::new(LoggingNode)).await?;
    info!(addr = %server.local_addr()?, "Shard node ready");
    server.serve().await?;
    Ok(())
}
