//! Router configuration

use crate::error::Result;
use realtime_rpc::{DialConfig, DEFAULT_DIAL_TIMEOUT};
use realtime_shard::ShardMap;
use std::time::Duration;

/// Router configuration.
///
/// Immutable once handed to a router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Pubsub service as `name:port`, e.g. `realtime:48883`
    pub service: String,
    /// Number of shard nodes
    pub max_nodes: usize,
    /// Bound on a single blocking dial
    pub dial_timeout: Duration,
    /// Drop a shard's cached connection after a failed publish so the next
    /// send re-dials. Off by default: connections are kept regardless.
    pub invalidate_on_error: bool,
}

impl RouterConfig {
    pub fn new(service: impl Into<String>, max_nodes: usize) -> Self {
        Self {
            service: service.into(),
            max_nodes,
            ..Default::default()
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let service = std::env::var("REALTIME_SERVICE").unwrap_or(defaults.service);

        let max_nodes = std::env::var("REALTIME_MAX_NODES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_nodes);

        let dial_timeout = std::env::var("REALTIME_DIAL_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.dial_timeout);

        let invalidate_on_error = std::env::var("REALTIME_INVALIDATE_ON_ERROR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.invalidate_on_error);

        Self {
            service,
            max_nodes,
            dial_timeout,
            invalidate_on_error,
        }
    }

    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }

    pub fn with_invalidate_on_error(mut self, invalidate_on_error: bool) -> Self {
        self.invalidate_on_error = invalidate_on_error;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<ShardMap> {
        Ok(ShardMap::parse(&self.service, self.max_nodes)?)
    }

    pub fn dial_config(&self) -> DialConfig {
        DialConfig::default().with_timeout(self.dial_timeout)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            service: "realtime:48883".to_string(),
            max_nodes: 1,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            invalidate_on_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterError;
    use realtime_shard::ShardError;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.service, "realtime:48883");
        assert_eq!(config.dial_timeout, Duration::from_secs(10));
        assert!(!config.invalidate_on_error);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_nodes() {
        let err = RouterConfig::new("realtime:48883", 0).validate().unwrap_err();
        assert!(matches!(
            err,
            RouterError::Config(ShardError::InvalidShardCount(0))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_port() {
        let err = RouterConfig::new("realtime", 4).validate().unwrap_err();
        assert!(matches!(err, RouterError::Config(ShardError::MissingPort(_))));
    }

    #[test]
    fn test_dial_config_uses_timeout() {
        let config =
            RouterConfig::new("realtime:48883", 4).with_dial_timeout(Duration::from_millis(250));
        let dial = config.dial_config();
        assert_eq!(dial.timeout, Duration::from_millis(250));
        assert!(dial.wait_for_ready);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("REALTIME_SERVICE", "pubsub:7000");
        std::env::set_var("REALTIME_MAX_NODES", "8");
        std::env::set_var("REALTIME_DIAL_TIMEOUT_MS", "1500");
        std::env::set_var("REALTIME_INVALIDATE_ON_ERROR", "true");

        let config = RouterConfig::from_env();

        std::env::remove_var("REALTIME_SERVICE");
        std::env::remove_var("REALTIME_MAX_NODES");
        std::env::remove_var("REALTIME_DIAL_TIMEOUT_MS");
        std::env::remove_var("REALTIME_INVALIDATE_ON_ERROR");

        assert_eq!(config.service, "pubsub:7000");
        assert_eq!(config.max_nodes, 8);
        assert_eq!(config.dial_timeout, Duration::from_millis(1500));
        assert!(config.invalidate_on_error);
    }
}
