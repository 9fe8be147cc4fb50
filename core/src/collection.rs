//! Collection storage: read a whole collection, write a whole collection.
//!
//! # Design
//!
//! A collection is one JSON array holding every record of one type. It is
//! loaded wholesale, mutated in memory and rewritten wholesale. The storage
//! trait therefore only deals in opaque documents keyed by collection name;
//! the typed [`Collection`] handle does the (de)serialization.
//!
//! Nothing here serializes concurrent writers. Callers that read, modify and
//! write a collection must hold its guard from
//! [`CollectionLocks`](crate::CollectionLocks) for the whole sequence.
//!
//! # Implementations
//!
//! - [`JsonFileStore`](crate::JsonFileStore): one `<name>.json` file per collection
//! - [`InMemoryCollectionStore`]: process-lifetime storage, reset on restart

use crate::error::{DomainError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

/// Boxed future returned by [`CollectionStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Backend that persists serialized collections by name.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so services can share one `Arc<dyn CollectionStore>` regardless of backend.
pub trait CollectionStore: Send + Sync {
    /// Load the serialized document for a collection.
    ///
    /// Returns `None` when the collection has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the backend cannot be read.
    fn load<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Option<Vec<u8>>>;

    /// Replace the serialized document for a collection.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the backend cannot be written.
    fn save<'a>(&'a self, name: &'a str, data: Vec<u8>) -> StoreFuture<'a, ()>;
}

/// Typed handle over one named collection.
///
/// # Example
///
/// ```
/// use boxoffice_core::collection::{Collection, InMemoryCollectionStore};
/// use boxoffice_core::types::Event;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), boxoffice_core::DomainError> {
/// let events: Collection<Event> = Collection::new(Arc::new(InMemoryCollectionStore::new()), "events");
/// assert!(events.read_all().await?.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct Collection<T> {
    store: Arc<dyn CollectionStore>,
    name: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name,
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a handle for the named collection.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _record: PhantomData,
        }
    }

    /// Collection name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the collection has ever been written.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the backend cannot be read.
    pub async fn exists(&self) -> Result<bool> {
        Ok(self.store.load(self.name).await?.is_some())
    }

    /// Read every record. A collection that was never written reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the backend fails or the stored
    /// document is not a JSON array of `T`.
    pub async fn read_all(&self) -> Result<Vec<T>> {
        let Some(bytes) = self.store.load(self.name).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(collection = self.name, error = %e, "Stored collection is not valid");
            DomainError::storage(format!("collection '{}' is corrupt: {e}", self.name))
        })
    }

    /// Serialize every record and overwrite the stored collection.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if serialization or the backend write fails.
    pub async fn write_all(&self, records: &[T]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records).map_err(|e| {
            DomainError::storage(format!("cannot serialize collection '{}': {e}", self.name))
        })?;
        self.store.save(self.name, bytes).await?;

        tracing::debug!(collection = self.name, records = records.len(), "Collection written");
        Ok(())
    }
}

/// In-memory collection storage.
///
/// Collections live for the lifetime of the process. Cloning shares the
/// underlying map.
///
/// # Example
///
/// ```
/// use boxoffice_core::collection::{CollectionStore, InMemoryCollectionStore};
///
/// # async fn example() -> Result<(), boxoffice_core::DomainError> {
/// let store = InMemoryCollectionStore::new();
/// store.save("users", b"[]".to_vec()).await?;
/// assert_eq!(store.load("users").await?, Some(b"[]".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryCollectionStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryCollectionStore {
    /// Create a new empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for InMemoryCollectionStore {
    fn load<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            let data = self
                .data
                .read()
                .map_err(|_| DomainError::storage("in-memory store lock poisoned"))?;
            Ok(data.get(name).cloned())
        })
    }

    fn save<'a>(&'a self, name: &'a str, bytes: Vec<u8>) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut data = self
                .data
                .write()
                .map_err(|_| DomainError::storage("in-memory store lock poisoned"))?;
            data.insert(name.to_string(), bytes);
            Ok(())
        })
    }
}
