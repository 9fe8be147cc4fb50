//! Flat-file collection storage: one JSON document per collection.

use crate::collection::{CollectionStore, StoreFuture};
use crate::error::DomainError;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Stores each collection as `<dir>/<name>.json`.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a reader never observes a half-written document.
///
/// # Example
///
/// ```no_run
/// use boxoffice_core::JsonFileStore;
/// use boxoffice_core::collection::CollectionStore;
///
/// # async fn example() -> Result<(), boxoffice_core::DomainError> {
/// let store = JsonFileStore::new("data");
/// store.save("events", b"[]".to_vec()).await?; // writes data/events.json
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the document backing `name`.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl CollectionStore for JsonFileStore {
    fn load<'a>(&'a self, name: &'a str) -> StoreFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move {
            let path = self.path_for(name);
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to read collection");
                    Err(DomainError::storage(format!(
                        "cannot read {}: {e}",
                        path.display()
                    )))
                }
            }
        })
    }

    fn save<'a>(&'a self, name: &'a str, data: Vec<u8>) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let path = self.path_for(name);
            let tmp = self.dir.join(format!("{name}.json.tmp"));

            let write = async {
                tokio::fs::create_dir_all(&self.dir).await?;
                tokio::fs::write(&tmp, &data).await?;
                tokio::fs::rename(&tmp, &path).await
            };

            write.await.map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "Failed to write collection");
                DomainError::storage(format!("cannot write {}: {e}", path.display()))
            })
        })
    }
}
