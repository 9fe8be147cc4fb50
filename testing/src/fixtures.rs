//! Pre-populated in-memory stores.

use boxoffice_core::collection::{Collection, CollectionStore, InMemoryCollectionStore};
use boxoffice_core::types::{Event, Member, Product, Receipt, User, collections};
use boxoffice_core::{CollectionLocks, Result};
use std::sync::Arc;

/// Builder for an in-memory store seeded with records.
#[derive(Debug, Default)]
pub struct Fixture {
    users: Option<Vec<User>>,
    events: Option<Vec<Event>>,
    receipts: Option<Vec<Receipt>>,
    products: Option<Vec<Product>>,
    members: Option<Vec<Member>>,
}

/// A seeded store plus the locks that guard it.
#[derive(Clone)]
pub struct SeededStore {
    /// Shared in-memory backend
    pub store: Arc<dyn CollectionStore>,
    /// Lock registry to hand to services under test
    pub locks: CollectionLocks,
}

impl Fixture {
    /// Start an empty fixture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the users collection
    #[must_use]
    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = Some(users);
        self
    }

    /// Seed the events collection
    #[must_use]
    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = Some(events);
        self
    }

    /// Seed the receipts collection
    #[must_use]
    pub fn with_receipts(mut self, receipts: Vec<Receipt>) -> Self {
        self.receipts = Some(receipts);
        self
    }

    /// Seed the products collection
    #[must_use]
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = Some(products);
        self
    }

    /// Seed the members collection
    #[must_use]
    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = Some(members);
        self
    }

    /// Write every seeded collection. Collections that were not seeded stay absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a collection cannot be serialized.
    pub async fn build(self) -> Result<SeededStore> {
        let store: Arc<dyn CollectionStore> = Arc::new(InMemoryCollectionStore::new());

        if let Some(users) = self.users {
            Collection::new(Arc::clone(&store), collections::USERS).write_all(&users).await?;
        }
        if let Some(events) = self.events {
            Collection::new(Arc::clone(&store), collections::EVENTS).write_all(&events).await?;
        }
        if let Some(receipts) = self.receipts {
            Collection::new(Arc::clone(&store), collections::RECEIPTS).write_all(&receipts).await?;
        }
        if let Some(products) = self.products {
            Collection::new(Arc::clone(&store), collections::PRODUCTS).write_all(&products).await?;
        }
        if let Some(members) = self.members {
            Collection::new(Arc::clone(&store), collections::MEMBERS).write_all(&members).await?;
        }

        Ok(SeededStore {
            store,
            locks: CollectionLocks::new(),
        })
    }
}

impl SeededStore {
    /// Current users collection
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be read.
    pub async fn users(&self) -> Result<Vec<User>> {
        Collection::new(Arc::clone(&self.store), collections::USERS).read_all().await
    }

    /// Current events collection
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be read.
    pub async fn events(&self) -> Result<Vec<Event>> {
        Collection::new(Arc::clone(&self.store), collections::EVENTS).read_all().await
    }

    /// Current receipts collection
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be read.
    pub async fn receipts(&self) -> Result<Vec<Receipt>> {
        Collection::new(Arc::clone(&self.store), collections::RECEIPTS).read_all().await
    }

    /// Current products collection
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be read.
    pub async fn products(&self) -> Result<Vec<Product>> {
        Collection::new(Arc::clone(&self.store), collections::PRODUCTS).read_all().await
    }

    /// Current members collection
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be read.
    pub async fn members(&self) -> Result<Vec<Member>> {
        Collection::new(Arc::clone(&self.store), collections::MEMBERS).read_all().await
    }
}
