//! Client-side load balancing across the endpoints behind one shard address

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selection over a fixed number of endpoints
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next endpoint out of `len`.
    ///
    /// `len` must be non-zero.
    pub fn next(&self, len: usize) -> usize {
        self.counter.fetch_add(1, Ordering::Relaxed) % len
    }
}
