//! Shard router

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::table::ConnectionTable;
use realtime_rpc::{Dialer, PublishMessage, PubsubClient, TcpDialer};
use realtime_shard::ShardMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Routes each message to the shard that owns its account, dialing shards
/// lazily and reusing the connection for every later send.
pub struct ShardRouter<D: Dialer = TcpDialer> {
    config: RouterConfig,
    shards: ShardMap,
    dialer: D,
    table: ConnectionTable<D::Client>,
}

impl ShardRouter<TcpDialer> {
    /// Create a router that dials shards over plain TCP.
    ///
    /// Fails with [`RouterError::Config`] on a malformed service string or a
    /// zero shard count. No connection is made here.
    pub fn new(config: RouterConfig) -> Result<Self> {
        let dialer = TcpDialer::new(config.dial_config());
        Self::with_dialer(config, dialer)
    }
}

impl<D: Dialer> ShardRouter<D> {
    pub fn with_dialer(config: RouterConfig, dialer: D) -> Result<Self> {
        let shards = config.validate()?;
        let table = ConnectionTable::new(shards.shard_count());

        debug!(
            service = %shards.service(),
            shard_count = shards.shard_count(),
            "Created shard router"
        );

        Ok(Self {
            config,
            shards,
            dialer,
            table,
        })
    }

    /// Publish `payload` on `topics` to the shard owning `account_id`.
    ///
    /// An empty `topics` list is a successful no-op. Otherwise exactly one
    /// publish call is made; its error is returned as
    /// [`RouterError::Publish`] with the RPC error untouched as the source.
    pub async fn send(
        &self,
        account_id: &str,
        topics: Vec<String>,
        payload: Vec<u8>,
    ) -> Result<()> {
        if topics.is_empty() {
            return Ok(());
        }

        let shard = self.shards.shard_for(account_id);
        let client = self.get_handle(shard).await?;

        let message = PublishMessage::new(account_id, topics, payload);
        match client.publish(message).await {
            Ok(()) => Ok(()),
            Err(source) => {
                if self.config.invalidate_on_error && self.table.invalidate(shard, &client) {
                    info!(shard, error = %source, "Dropped shard connection after failed publish");
                }
                Err(RouterError::Publish { shard, source })
            }
        }
    }

    /// Ready-to-use handle for `shard`, dialing it on first access.
    ///
    /// Concurrent first callers for the same shard share one dial. A failed
    /// dial caches nothing, so the next call dials again.
    pub async fn get_handle(&self, shard: usize) -> Result<Arc<D::Client>> {
        if shard >= self.table.len() {
            return Err(RouterError::ShardOutOfRange {
                shard,
                shard_count: self.table.len(),
            });
        }

        self.table
            .get_or_try_init(shard, || async move {
                let address = self.shards.address_of(shard);
                debug!(shard, address = %address, "Dialing shard");

                let dialed = self.dialer.dial(&address).await;
                match dialed {
                    Ok(client) => {
                        debug!(shard, address = %address, "Cached shard connection");
                        Ok(client)
                    }
                    Err(source) => Err(RouterError::Connect {
                        shard,
                        address,
                        source,
                    }),
                }
            })
            .await
    }

    /// Shard index that owns `account_id`
    pub fn shard_for(&self, account_id: &str) -> usize {
        self.shards.shard_for(account_id)
    }

    pub fn address_of(&self, shard: usize) -> String {
        self.shards.address_of(shard)
    }

    pub fn is_connected(&self, shard: usize) -> bool {
        self.table.get(shard).is_some()
    }

    /// Number of shards with a cached connection
    pub fn connected_shards(&self) -> usize {
        self.table.filled()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.shard_count()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn dialer(&self) -> &D {
        &self.dialer
    }
}
