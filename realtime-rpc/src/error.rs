//! RPC error types

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Failed to connect to {address}: {reason}")]
    Connect { address: String, reason: String },

    #[error("Timed out after {timeout:?} waiting for {address} to accept connections")]
    Timeout { address: String, timeout: Duration },

    #[error("Failed to resolve {address}: {reason}")]
    Resolve { address: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Publish rejected: {0}")]
    Rejected(String),

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RpcError {
    /// True for failures that happen before a usable connection exists
    pub fn is_connect(&self) -> bool {
        matches!(
            self,
            RpcError::Connect { .. } | RpcError::Timeout { .. } | RpcError::Resolve { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
