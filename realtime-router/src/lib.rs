//! Realtime Router - Sends pubsub messages to the shard that owns the account
//!
//! # Architecture
//!
//! ```text
//! send(account, topics, payload)
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │       ShardMap          │  crc32(account) % max_nodes
//! └───────────┬─────────────┘
//!             │ shard index
//!             ▼
//! ┌─────────────────────────┐
//! │   ConnectionTable       │  one slot per shard, dialed on first use
//! └───────────┬─────────────┘
//!             │ Arc<client>
//!             ▼
//!       Publish RPC
//! ```
//!
//! Nothing is dialed at construction, so start-up cost does not grow with the
//! shard count. Each shard is dialed at most once; concurrent first callers for
//! the same shard wait on that shard's dial only, and callers whose shard is
//! already connected never wait on a dial.
//!
//! # Example
//!
//! ```rust,ignore
//! use realtime_router::{RouterConfig, ShardRouter};
//!
//! let router = ShardRouter::new(RouterConfig::new("realtime:48883", 16))?;
//! router.send("acct-42", vec!["chat".into()], b"hi".to_vec()).await?;
//! ```

mod config;
mod error;
mod router;
mod table;

pub use config::RouterConfig;
pub use error::{Result, RouterError};
pub use router::ShardRouter;

pub use realtime_rpc::{DialConfig, Dialer, PublishMessage, PubsubClient, TcpDialer};
pub use realtime_shard::{resolve_shard, shard_address, ServiceAddress, ShardMap};
