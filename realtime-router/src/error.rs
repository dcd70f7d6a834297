//! Router error types

use realtime_rpc::RpcError;
use realtime_shard::ShardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// Malformed service string or non-positive shard count
    #[error("Invalid router configuration: {0}")]
    Config(#[from] ShardError),

    /// No usable connection to the shard could be established
    #[error("Failed to connect to shard {shard} at {address}: {source}")]
    Connect {
        shard: usize,
        address: String,
        #[source]
        source: RpcError,
    },

    /// The shard was connected but the Publish call failed
    #[error("Publish to shard {shard} failed: {source}")]
    Publish {
        shard: usize,
        #[source]
        source: RpcError,
    },

    #[error("Shard {shard} out of range (shard count {shard_count})")]
    ShardOutOfRange { shard: usize, shard_count: usize },
}

impl RouterError {
    /// The underlying RPC error, as returned by the dial or publish call
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            RouterError::Connect { source, .. } | RouterError::Publish { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    pub fn into_rpc_error(self) -> Option<RpcError> {
        match self {
            RouterError::Connect { source, .. } | RouterError::Publish { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// Shard the failing call was routed to, if it got that far
    pub fn shard(&self) -> Option<usize> {
        match self {
            RouterError::Connect { shard, .. }
            | RouterError::Publish { shard, .. }
            | RouterError::ShardOutOfRange { shard, .. } => Some(*shard),
            RouterError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
