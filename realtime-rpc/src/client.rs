//! Pubsub RPC client

use crate::balancer::RoundRobin;
use crate::error::{Result, RpcError};
use crate::messages::{decode, encode, PublishMessage, PublishResponse};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::debug;

/// Anything that can carry a `Publish` call to one shard.
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait PubsubClient: Send + Sync {
    async fn publish(&self, message: PublishMessage) -> Result<()>;
}

#[derive(Debug)]
struct Endpoint {
    addr: SocketAddr,
    framed: Mutex<Framed<TcpStream, LengthDelimitedCodec>>,
}

/// Connected client for one shard address.
///
/// The address may resolve to several endpoints; each publish goes to the
/// next one in round-robin order. Requests on the same endpoint are
/// serialized, one request frame followed by one response frame.
///
/// Each exchange runs on its own task, so dropping a `publish` future
/// midway never leaves a half-written request or an unread response on
/// the connection.
#[derive(Debug)]
pub struct TcpPubsubClient {
    address: String,
    endpoints: Vec<Arc<Endpoint>>,
    balancer: RoundRobin,
}

impl TcpPubsubClient {
    /// Build a client from already-connected streams.
    ///
    /// Returns `None` when `streams` is empty.
    pub fn from_streams(
        address: impl Into<String>,
        streams: Vec<(SocketAddr, TcpStream)>,
    ) -> Option<Self> {
        if streams.is_empty() {
            return None;
        }

        let endpoints = streams
            .into_iter()
            .map(|(addr, stream)| {
                Arc::new(Endpoint {
                    addr,
                    framed: Mutex::new(Framed::new(stream, LengthDelimitedCodec::new())),
                })
            })
            .collect();

        Some(Self {
            address: address.into(),
            endpoints,
            balancer: RoundRobin::new(),
        })
    }

    /// The address this client was dialed with
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Resolved endpoints behind the address
    pub fn endpoints(&self) -> Vec<SocketAddr> {
        self.endpoints.iter().map(|e| e.addr).collect()
    }
}

#[async_trait]
impl PubsubClient for TcpPubsubClient {
    async fn publish(&self, message: PublishMessage) -> Result<()> {
        let endpoint = self.endpoints[self.balancer.next(self.endpoints.len())].clone();

        debug!(
            account_id = %message.account_id,
            topics = message.topics.len(),
            endpoint = %endpoint.addr,
            "Publishing to shard"
        );

        let request = encode(&message)?;
        let addr = endpoint.addr;
        let response = tokio::spawn(async move { endpoint.exchange(request).await })
            .await
            .map_err(|e| RpcError::Network(format!("publish to {addr} aborted: {e}")))??;

        if response.accepted {
            Ok(())
        } else {
            Err(RpcError::Rejected(response.message))
        }
    }
}

impl Endpoint {
    /// One request frame out, one response frame in
    async fn exchange(&self, request: Bytes) -> Result<PublishResponse> {
        let mut framed = self.framed.lock().await;
        framed.send(request).await?;

        let frame = framed
            .next()
            .await
            .ok_or_else(|| RpcError::Network(format!("{} closed the connection", self.addr)))??;

        decode(&frame)
    }
}
