//! Per-shard connection table

use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

struct Slot<C> {
    /// Cached handle. Never held across an await.
    handle: RwLock<Option<Arc<C>>>,
    /// Serializes first access to this shard only
    dial_gate: Mutex<()>,
}

impl<C> Slot<C> {
    fn new() -> Self {
        Self {
            handle: RwLock::new(None),
            dial_gate: Mutex::new(()),
        }
    }

    fn cached(&self) -> Option<Arc<C>> {
        self.handle.read().clone()
    }
}

/// Fixed-size table of lazily created handles, indexed by shard.
///
/// A slot is filled at most once per successful initialization. A failed
/// initialization leaves the slot empty so the next caller tries again.
pub(crate) struct ConnectionTable<C> {
    slots: Vec<Slot<C>>,
}

impl<C> ConnectionTable<C> {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| Slot::new()).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<Arc<C>> {
        self.slots.get(index).and_then(Slot::cached)
    }

    pub(crate) fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.handle.read().is_some()).count()
    }

    /// Return the handle in slot `index`, creating it with `init` if empty.
    ///
    /// Panics if `index` is out of bounds.
    pub(crate) async fn get_or_try_init<F, Fut, E>(
        &self,
        index: usize,
        init: F,
    ) -> Result<Arc<C>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C, E>>,
    {
        let slot = &self.slots[index];
        if let Some(handle) = slot.cached() {
            return Ok(handle);
        }

        let _gate = slot.dial_gate.lock().await;
        // Another caller may have filled the slot while we waited
        if let Some(handle) = slot.cached() {
            return Ok(handle);
        }

        let handle = Arc::new(init().await?);
        *slot.handle.write() = Some(handle.clone());
        Ok(handle)
    }

    /// Empty slot `index` if it still holds `handle`
    pub(crate) fn invalidate(&self, index: usize, handle: &Arc<C>) -> bool {
        let Some(slot) = self.slots.get(index) else {
            return false;
        };
        let mut cached = slot.handle.write();
        match cached.as_ref() {
            Some(current) if Arc::ptr_eq(current, handle) => {
                *cached = None;
                true
            }
            _ => false,
        }
    }
}
