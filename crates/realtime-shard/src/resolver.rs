//! Account → shard resolution

use crate::error::{Result, ShardError};
use crate::service::ServiceAddress;

/// Map an account id to a shard index in `[0, shard_count)`.
///
/// `crc32_ieee(account_id) % shard_count`. Callers guarantee a non-zero
/// shard count; [`ShardMap::new`] rejects zero at construction.
#[inline]
pub fn resolve_shard(account_id: &str, shard_count: usize) -> usize {
    debug_assert!(shard_count > 0, "shard_count must be positive");
    crc32fast::hash(account_id.as_bytes()) as usize % shard_count
}

/// Address of shard `index`: `{base}-{index}.{base}:{port}`
pub fn shard_address(base: &str, index: usize, port: &str) -> String {
    format!("{base}-{index}.{base}:{port}")
}

/// Validated service address plus shard count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardMap {
    service: ServiceAddress,
    shard_count: usize,
}

impl ShardMap {
    pub fn new(service: ServiceAddress, shard_count: usize) -> Result<Self> {
        if shard_count == 0 {
            return Err(ShardError::InvalidShardCount(shard_count));
        }
        Ok(Self {
            service,
            shard_count,
        })
    }

    /// Parse `service` and validate `shard_count` in one step
    pub fn parse(service: &str, shard_count: usize) -> Result<Self> {
        Self::new(ServiceAddress::parse(service)?, shard_count)
    }

    pub fn service(&self) -> &ServiceAddress {
        &self.service
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    pub fn shard_for(&self, account_id: &str) -> usize {
        resolve_shard(account_id, self.shard_count)
    }

    pub fn address_of(&self, shard: usize) -> String {
        self.service.shard_address(shard)
    }

    pub fn address_for(&self, account_id: &str) -> String {
        self.address_of(self.shard_for(account_id))
    }
}
