//! # Box Office Core
//!
//! Records, error taxonomy and collection storage shared by the box office
//! services.
//!
//! ## Core Concepts
//!
//! - **Record**: one entry of a collection (`User`, `Event`, `Receipt`, `Product`)
//! - **Collection**: the full set of records of one type, persisted as a single
//!   JSON array and rewritten wholesale on every mutation
//! - **CollectionStore**: where collections live (JSON files or process memory)
//! - **CollectionLocks**: the serialization point for read-modify-write sequences
//! - **DomainError**: the one error taxonomy every service returns
//!
//! ## Example
//!
//! ```no_run
//! use boxoffice_core::collection::{Collection, InMemoryCollectionStore};
//! use boxoffice_core::types::User;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), boxoffice_core::DomainError> {
//! let store = Arc::new(InMemoryCollectionStore::new());
//! let users: Collection<User> = Collection::new(store, "users");
//!
//! let mut all = users.read_all().await?;
//! all.push(User::new("alice", "secret"));
//! users.write_all(&all).await?;
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod environment;
pub mod error;
pub mod json_file;
pub mod locks;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use collection::{Collection, CollectionStore, InMemoryCollectionStore};
pub use error::{DomainError, Result};
pub use json_file::JsonFileStore;
pub use locks::CollectionLocks;
