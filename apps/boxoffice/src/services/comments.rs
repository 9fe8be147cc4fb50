//! Read-only access to the comments collection.
//!
//! Comments are written by a separate service; records are passed through
//! untouched.

use boxoffice_core::types::collections;
use boxoffice_core::{Collection, CollectionStore, Result};
use serde_json::Value;
use std::sync::Arc;

/// Lists stored comments.
#[derive(Clone, Debug)]
pub struct CommentService {
    comments: Collection<Value>,
}

impl CommentService {
    /// Create a comment service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            comments: Collection::new(store, collections::COMMENTS),
        }
    }

    /// Every stored comment, empty when none were ever written.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<Value>> {
        self.comments.read_all().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use boxoffice_core::InMemoryCollectionStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_comments_pass_through() {
        let store = InMemoryCollectionStore::new();
        store
            .save(collections::COMMENTS, br#"[{"text":"great show","stars":5}]"#.to_vec())
            .await
            .unwrap();

        let comments = CommentService::new(Arc::new(store)).list().await.unwrap();

        assert_eq!(comments, vec![json!({"text": "great show", "stars": 5})]);
    }

    #[tokio::test]
    async fn test_absent_comments_are_empty() {
        let comments = CommentService::new(Arc::new(InMemoryCollectionStore::new()));
        assert!(comments.list().await.unwrap().is_empty());
    }
}
