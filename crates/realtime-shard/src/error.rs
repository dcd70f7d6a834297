//! Shard configuration errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShardError {
    #[error("Service '{0}' has no port (expected name:port)")]
    MissingPort(String),

    #[error("Service '{0}' has an empty name")]
    EmptyName(String),

    #[error("Service '{0}' has an empty port")]
    EmptyPort(String),

    #[error("Shard count must be positive, got {0}")]
    InvalidShardCount(usize),
}

pub type Result<T> = std::result::Result<T, ShardError>;
