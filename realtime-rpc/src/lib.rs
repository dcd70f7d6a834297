//! Realtime RPC - Publish contract for pubsub shard nodes
//!
//! This crate provides the wire-level pieces between a router and a shard:
//! - Router -> Shard (`Publish(account_id, payload, topics)`)
//! - Shard side request handling (used by tests and `realtime serve`)
//!
//! Messages are bincode-encoded, one message per length-delimited frame over
//! plain TCP. Shards are assumed to sit on a trusted internal network, so the
//! transport carries no TLS.

pub mod balancer;
pub mod client;
pub mod dial;
pub mod error;
pub mod messages;
pub mod server;

pub use balancer::RoundRobin;
pub use client::{PubsubClient, TcpPubsubClient};
pub use dial::{DialConfig, Dialer, TcpDialer, DEFAULT_DIAL_TIMEOUT};
pub use error::{Result, RpcError};
pub use messages::{PublishMessage, PublishResponse};
pub use server::{PublishHandler, PubsubServer};
