//! Service string parsing (`name:port`)

use crate::error::{Result, ShardError};
use crate::resolver::shard_address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base service name and port of a sharded pubsub deployment.
///
/// Each shard lives at `{name}-{index}.{name}:{port}`, i.e. the pod name
/// followed by the headless service name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceAddress {
    pub name: String,
    pub port: String,
}

impl ServiceAddress {
    /// Parse a `name:port` service string.
    ///
    /// Splits on the first colon only, so everything after it is the port.
    pub fn parse(service: &str) -> Result<Self> {
        let (name, port) = service
            .split_once(':')
            .ok_or_else(|| ShardError::MissingPort(service.to_string()))?;

        if name.is_empty() {
            return Err(ShardError::EmptyName(service.to_string()));
        }
        if port.is_empty() {
            return Err(ShardError::EmptyPort(service.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            port: port.to_string(),
        })
    }

    /// Network address of the shard with the given index
    pub fn shard_address(&self, shard: usize) -> String {
        shard_address(&self.name, shard, &self.port)
    }
}

impl FromStr for ServiceAddress {
    type Err = ShardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.port)
    }
}
