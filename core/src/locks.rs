//! Per-collection serialization of read-modify-write sequences.
//!
//! Collections are rewritten wholesale, so two writers holding stale copies of
//! the same collection lose each other's updates. Every mutation therefore
//! holds the collection's guard from the first read to the final write.
//!
//! Lock order: `events` before `receipts`. No path takes them the other way.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async mutexes keyed by collection name.
///
/// Cloning shares the registry.
///
/// # Example
///
/// ```
/// use boxoffice_core::CollectionLocks;
///
/// # async fn example() {
/// let locks = CollectionLocks::new();
/// let _events = locks.acquire("events").await;
/// // load events, check, mutate, write: no other writer can interleave
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct CollectionLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// Held for the duration of one read-modify-write sequence.
#[derive(Debug)]
pub struct CollectionGuard {
    name: String,
    _guard: OwnedMutexGuard<()>,
}

impl CollectionGuard {
    /// Name of the locked collection.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CollectionLocks {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the named collection.
    pub async fn acquire(&self, name: &str) -> CollectionGuard {
        let mutex = self.mutex_for(name);
        let guard = mutex.lock_owned().await;
        tracing::trace!(collection = name, "Collection lock acquired");
        CollectionGuard {
            name: name.to_string(),
            _guard: guard,
        }
    }

    fn mutex_for(&self, name: &str) -> Arc<AsyncMutex<()>> {
        // The registry map is only touched synchronously, never across an await.
        let mut locks = match self.locks.lock() {
            Ok(locks) => locks,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(locks.entry(name.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_collection_is_exclusive() {
        let locks = CollectionLocks::new();
        let guard = locks.acquire("events").await;

        let contender = locks.clone();
        let blocked = tokio::time::timeout(Duration::from_millis(50), async move {
            contender.acquire("events").await
        })
        .await;
        assert!(blocked.is_err());

        drop(guard);
        let again = locks.acquire("events").await;
        assert_eq!(again.name(), "events");
    }

    #[tokio::test]
    async fn test_different_collections_do_not_block() {
        let locks = CollectionLocks::new();
        let _events = locks.acquire("events").await;

        let receipts = tokio::time::timeout(Duration::from_millis(50), locks.acquire("receipts")).await;
        assert!(receipts.is_ok());
    }
}
