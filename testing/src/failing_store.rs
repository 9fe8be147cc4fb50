//! A store wrapper that rejects writes to chosen collections.

use boxoffice_core::DomainError;
use boxoffice_core::collection::{CollectionStore, StoreFuture};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Delegates to an inner store, failing `save` for configured collections.
///
/// Each rule allows a number of successful saves before every further save of
/// that collection fails with `Storage("<name> disk full")`. Loads always pass.
///
/// # Example
///
/// ```
/// use boxoffice_core::collection::{CollectionStore, InMemoryCollectionStore};
/// use boxoffice_testing::FailingStore;
/// use std::sync::Arc;
///
/// # async fn example() {
/// let store = FailingStore::new(Arc::new(InMemoryCollectionStore::new())).fail_saves("receipts");
/// assert!(store.save("receipts", b"[]".to_vec()).await.is_err());
/// assert!(store.save("events", b"[]".to_vec()).await.is_ok());
/// # }
/// ```
pub struct FailingStore {
    inner: Arc<dyn CollectionStore>,
    allowed_saves: Mutex<HashMap<String, usize>>,
}

impl FailingStore {
    /// Wrap `inner` with no failure rules.
    #[must_use]
    pub fn new(inner: Arc<dyn CollectionStore>) -> Self {
        Self {
            inner,
            allowed_saves: Mutex::new(HashMap::new()),
        }
    }

    /// Fail every save of `name`.
    #[must_use]
    pub fn fail_saves(self, name: &str) -> Self {
        self.fail_saves_after(name, 0)
    }

    /// Let `successes` saves of `name` through, then fail the rest.
    #[must_use]
    pub fn fail_saves_after(self, name: &str, successes: usize) -> Self {
        if let Ok(mut rules) = self.allowed_saves.lock() {
            rules.insert(name.to_string(), successes);
        }
        self
    }

    fn admit(&self, name: &str) -> Result<(), DomainError> {
        let mut rules = self
            .allowed_saves
            .lock()
            .map_err(|_| DomainError::storage("failure rules poisoned"))?;
        match rules.get_mut(name) {
            None => Ok(()),
            Some(0) => Err(DomainError::storage(format!("{name} disk full"))),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
        }
    }
}

impl CollectionStore for FailingStore {
    fn load<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Option<Vec<u8>>> {
        self.inner.load(name)
    }

    fn save<'a>(&'a self, name: &'a str, data: Vec<u8>) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.admit(name)?;
            self.inner.save(name, data).await
        })
    }
}
