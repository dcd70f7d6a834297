//! Realtime Shard - Shard selection for the pubsub service
//!
//! Maps account identifiers onto one of `N` pubsub shard nodes and builds the
//! network address of each shard.
//!
//! # Architecture
//!
//! ```text
//! account id
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │     resolve_shard       │  crc32(account) % shard_count
//! │   (Which shard?)        │
//! └───────────┬─────────────┘
//!             │
//!             ▼
//! ┌─────────────────────────┐
//! │     shard_address       │  "{name}-{index}.{name}:{port}"
//! │   (Where is it?)        │
//! └─────────────────────────┘
//! ```
//!
//! The hash is CRC-32 (IEEE). It is not a security boundary, but it must stay
//! bit-exact with every other client that routes to the same shards.
//!
//! # Example
//!
//! ```rust
//! use realtime_shard::{ServiceAddress, ShardMap};
//!
//! let service: ServiceAddress = "realtime:48883".parse().unwrap();
//! let map = ShardMap::new(service, 4).unwrap();
//!
//! let shard = map.shard_for("hello");
//! assert_eq!(shard, 2);
//! assert_eq!(map.address_of(shard), "realtime-2.realtime:48883");
//! ```

mod error;
mod resolver;
mod service;

pub use error::{Result, ShardError};
pub use resolver::{resolve_shard, shard_address, ShardMap};
pub use service::ServiceAddress;
