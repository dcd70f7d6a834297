//! Shard-side Publish server

use crate::error::Result;
use crate::messages::{decode, encode, PublishMessage, PublishResponse};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::task::JoinHandle;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tracing::{debug, info, warn};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Receives Publish calls on a shard node.
///
/// `Err(reason)` is reported back to the caller as a rejected publish.
#[async_trait]
pub trait PublishHandler: Send + Sync {
    async fn handle_publish(&self, message: PublishMessage) -> std::result::Result<(), String>;
}

pub struct PubsubServer<H> {
    listener: TcpListener,
    handler: Arc<H>,
}

impl<H: PublishHandler + 'static> PubsubServer<H> {
    pub async fn bind(addr: impl ToSocketAddrs, handler: Arc<H>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Pubsub server listening");
        Ok(Self { listener, handler })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever; a failed accept is logged and skipped
    pub async fn serve(self) -> Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            debug!(peer = %peer, "Accepted connection");

            let handler = self.handler.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, handler).await {
                    warn!(peer = %peer, error = %e, "Connection closed with error");
                }
            });
        }
    }

    /// Run [`serve`](Self::serve) on a background task
    pub fn spawn(self) -> JoinHandle<Result<()>> {
        tokio::spawn(self.serve())
    }
}

async fn handle_connection<H: PublishHandler>(stream: TcpStream, handler: Arc<H>) -> Result<()> {
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

    while let Some(frame) = framed.next().await {
        let message: PublishMessage = decode(&frame?)?;

        let response = match handler.handle_publish(message).await {
            Ok(()) => PublishResponse::accepted(),
            Err(reason) => PublishResponse::rejected(reason),
        };

        framed.send(encode(&response)?).await?;
    }

    Ok(())
}
