//! User registration and credential checks.

use super::require_fields;
use crate::metrics;
use boxoffice_core::types::{User, collections, names_match};
use boxoffice_core::{Collection, CollectionLocks, CollectionStore, DomainError, Result};
use std::sync::Arc;

/// Registers users and authenticates credentials.
#[derive(Clone, Debug)]
pub struct UserService {
    users: Collection<User>,
    locks: CollectionLocks,
}

impl UserService {
    /// Create a user service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, locks: CollectionLocks) -> Self {
        Self {
            users: Collection::new(store, collections::USERS),
            locks,
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if either field is empty
    /// - [`DomainError::Conflict`] if the username exists (case-insensitively)
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        require_fields(&[
            ("username", !username.is_empty()),
            ("password", !password.is_empty()),
        ])?;

        let _guard = self.locks.acquire(collections::USERS).await;
        let mut users = self.users.read_all().await?;

        if users.iter().any(|u| names_match(&u.username, username)) {
            tracing::warn!(username, "Registration rejected: username taken");
            return Err(DomainError::conflict(format!(
                "Username '{username}' already exists"
            )));
        }

        let user = User::new(username, password);
        users.push(user.clone());
        self.users.write_all(&users).await?;

        metrics::record_user_registered();
        tracing::info!(username, "User registered");
        Ok(user)
    }

    /// Find the user whose username and password both match verbatim.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Unauthorized`] if no stored user matches exactly
    /// - [`DomainError::Storage`] if the collection cannot be read
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let users = self.users.read_all().await?;
        users
            .into_iter()
            .find(|u| u.has_credentials(username, password))
            .ok_or_else(|| {
                tracing::warn!(username, "Authentication denied");
                DomainError::Unauthorized
            })
    }
}
