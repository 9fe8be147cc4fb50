//! Event creation and listing.

use super::{UserService, positive_count, require_fields};
use crate::metrics;
use boxoffice_core::types::{Event, collections, names_match};
use boxoffice_core::{Collection, CollectionLocks, CollectionStore, DomainError, Result};
use serde::Deserialize;
use std::sync::Arc;

/// Request to create an event. Missing strings deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEvent {
    /// Event name
    pub event_name: String,
    /// Initial inventory
    pub tickets_for_sale: Option<i64>,
    /// Creator's username
    pub username: String,
    /// Creator's password
    pub password: String,
}

/// Creates and lists events.
#[derive(Clone, Debug)]
pub struct EventService {
    events: Collection<Event>,
    locks: CollectionLocks,
    users: UserService,
}

impl EventService {
    /// Create an event service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, locks: CollectionLocks, users: UserService) -> Self {
        Self {
            events: Collection::new(store, collections::EVENTS),
            locks,
            users,
        }
    }

    /// Create an event owned by the authenticated caller.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if a field is missing or `ticketsForSale` is not positive
    /// - [`DomainError::Unauthorized`] if the credentials do not match
    /// - [`DomainError::Conflict`] if an event with the same name exists (case-insensitively)
    /// - [`DomainError::Storage`] if a collection cannot be read or written
    pub async fn create(&self, request: NewEvent) -> Result<Event> {
        require_fields(&[
            ("eventName", !request.event_name.is_empty()),
            ("ticketsForSale", request.tickets_for_sale.is_some()),
            ("username", !request.username.is_empty()),
            ("password", !request.password.is_empty()),
        ])?;
        let tickets_for_sale = positive_count("ticketsForSale", request.tickets_for_sale)?;

        let creator = self
            .users
            .authenticate(&request.username, &request.password)
            .await?;

        let _guard = self.locks.acquire(collections::EVENTS).await;
        let mut events = self.events.read_all().await?;

        if events
            .iter()
            .any(|e| names_match(&e.event_name, &request.event_name))
        {
            tracing::warn!(event = %request.event_name, "Event creation rejected: name taken");
            return Err(DomainError::conflict(format!(
                "Event '{}' already exists",
                request.event_name
            )));
        }

        let event = Event::new(request.event_name, tickets_for_sale, creator.username);
        events.push(event.clone());
        self.events.write_all(&events).await?;

        metrics::record_event_created(&event.event_name, tickets_for_sale);
        tracing::info!(
            event = %event.event_name,
            tickets_for_sale,
            created_by = %event.created_by,
            "Event created"
        );
        Ok(event)
    }

    /// Every event with its remaining inventory.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<Event>> {
        self.events.read_all().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use boxoffice_core::types::User;
    use boxoffice_testing::Fixture;
    use boxoffice_testing::fixtures::SeededStore;

    async fn setup(events: Vec<Event>) -> (EventService, SeededStore) {
        let fixture = Fixture::new()
            .with_users(vec![User::new("alice", "secret")])
            .with_events(events)
            .build()
            .await
            .unwrap();
        let users = UserService::new(Arc::clone(&fixture.store), fixture.locks.clone());
        let service = EventService::new(Arc::clone(&fixture.store), fixture.locks.clone(), users);
        (service, fixture)
    }

    fn request(event_name: &str, tickets_for_sale: i64) -> NewEvent {
        NewEvent {
            event_name: event_name.to_string(),
            tickets_for_sale: Some(tickets_for_sale),
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_records_creator() {
        let (events, fixture) = setup(Vec::new()).await;

        let event = events.create(request("Concert", 100)).await.unwrap();

        assert_eq!(event, Event::new("Concert", 100, "alice"));
        assert_eq!(fixture.events().await.unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn test_duplicate_name_differing_in_case_is_conflict() {
        let (events, fixture) = setup(vec![Event::new("Concert", 10, "alice")]).await;

        let err = events.create(request("concert", 5)).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(fixture.events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let (events, fixture) = setup(Vec::new()).await;

        let mut req = request("Concert", 10);
        req.password = "guess".to_string();

        assert_eq!(events.create(req).await.unwrap_err(), DomainError::Unauthorized);
        assert!(fixture.events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tickets_must_be_positive() {
        let (events, _fixture) = setup(Vec::new()).await;

        for tickets in [0, -5] {
            let err = events.create(request("Concert", tickets)).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_missing_fields_checked_before_auth() {
        let (events, _fixture) = setup(Vec::new()).await;

        let err = events
            .create(NewEvent {
                event_name: "Concert".to_string(),
                ..NewEvent::default()
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::validation("Missing required fields: ticketsForSale, username, password")
        );
    }
}
