//! Dialing shard addresses

use crate::client::{PubsubClient, TcpPubsubClient};
use crate::error::{Result, RpcError};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, TcpStream};
use tracing::debug;

/// Overall bound on a blocking dial
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(200);

/// Turns a shard address into a ready-to-use client
#[async_trait]
pub trait Dialer: Send + Sync {
    type Client: PubsubClient + 'static;

    async fn dial(&self, address: &str) -> Result<Self::Client>;
}

#[derive(Debug, Clone)]
pub struct DialConfig {
    /// Upper bound on the whole dial, resolution and retries included
    pub timeout: Duration,
    /// Pause between attempts while the shard is unreachable
    pub retry_interval: Duration,
    /// Keep retrying until the shard is reachable or `timeout` elapses.
    /// When false a single attempt is made.
    pub wait_for_ready: bool,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DIAL_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            wait_for_ready: true,
        }
    }
}

impl DialConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    pub fn with_wait_for_ready(mut self, wait_for_ready: bool) -> Self {
        self.wait_for_ready = wait_for_ready;
        self
    }
}

/// Plain TCP dialer (no TLS)
#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    config: DialConfig,
}

impl TcpDialer {
    pub fn new(config: DialConfig) -> Self {
        Self { config }
    }

    async fn wait_until_ready(&self, address: &str) -> TcpPubsubClient {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match connect_all(address).await {
                Ok(client) => return client,
                Err(e) => {
                    debug!(address = %address, attempt, reason = %e, "Shard not reachable yet");
                }
            }
            tokio::time::sleep(self.config.retry_interval).await;
        }
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    type Client = TcpPubsubClient;

    async fn dial(&self, address: &str) -> Result<TcpPubsubClient> {
        let timeout = self.config.timeout;

        let dialed = if self.config.wait_for_ready {
            let ready = async { Ok::<_, RpcError>(self.wait_until_ready(address).await) };
            tokio::time::timeout(timeout, ready).await
        } else {
            tokio::time::timeout(timeout, connect_all(address)).await
        };

        match dialed {
            Ok(result) => {
                let client = result?;
                debug!(address = %address, endpoints = ?client.endpoints(), "Dialed shard");
                Ok(client)
            }
            Err(_) => Err(RpcError::Timeout {
                address: address.to_string(),
                timeout,
            }),
        }
    }
}

/// Resolve `address` and connect to every endpoint that accepts.
///
/// Succeeds if at least one endpoint connected.
async fn connect_all(address: &str) -> Result<TcpPubsubClient> {
    let addrs: Vec<SocketAddr> = lookup_host(address)
        .await
        .map_err(|e| RpcError::Resolve {
            address: address.to_string(),
            reason: e.to_string(),
        })?
        .collect();

    let mut streams = Vec::with_capacity(addrs.len());
    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                if let Err(e) = stream.set_nodelay(true) {
                    debug!(endpoint = %addr, error = %e, "Failed to set TCP_NODELAY");
                }
                streams.push((addr, stream));
            }
            Err(e) => last_error = Some(e),
        }
    }

    TcpPubsubClient::from_streams(address, streams).ok_or_else(|| RpcError::Connect {
        address: address.to_string(),
        reason: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "address resolved to no endpoints".to_string()),
    })
}
