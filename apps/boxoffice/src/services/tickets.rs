//! Ticket purchases: the one multi-collection transaction.
//!
//! A purchase checks credentials, locates the event, checks and decrements
//! its inventory, then appends a receipt. The `events` guard is held from the
//! inventory read until the receipt is written, so two buyers can never both
//! see the same remaining count.

use super::{UserService, positive_count, require_fields};
use crate::metrics;
use boxoffice_core::types::{Event, Receipt, collections, names_match};
use boxoffice_core::{Collection, CollectionLocks, CollectionStore, DomainError, Result};
use serde::Deserialize;
use std::sync::Arc;

/// Request to buy tickets. Missing strings deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketPurchase {
    /// Buyer's username
    pub username: String,
    /// Buyer's password
    pub password: String,
    /// Event name, matched case-insensitively
    pub event_name: String,
    /// Number of tickets
    pub quantity: Option<i64>,
}

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    /// The receipt that was recorded
    pub receipt: Receipt,
    /// Tickets left for the event after this purchase
    pub remaining_tickets: u32,
}

/// Sells tickets against event inventory.
#[derive(Clone, Debug)]
pub struct TicketService {
    events: Collection<Event>,
    receipts: Collection<Receipt>,
    locks: CollectionLocks,
    users: UserService,
}

impl TicketService {
    /// Create a ticket service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, locks: CollectionLocks, users: UserService) -> Self {
        Self {
            events: Collection::new(Arc::clone(&store), collections::EVENTS),
            receipts: Collection::new(store, collections::RECEIPTS),
            locks,
            users,
        }
    }

    /// Buy tickets for an event.
    ///
    /// The receipt carries the event name as stored, not as typed by the buyer.
    /// If the receipt cannot be written the inventory decrement is reverted.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if a field is missing or `quantity` is not positive
    /// - [`DomainError::Unauthorized`] if the credentials do not match
    /// - [`DomainError::NotFound`] if no event has that name
    /// - [`DomainError::BusinessRule`] if fewer tickets remain than requested
    /// - [`DomainError::Storage`] if a collection cannot be read or written
    pub async fn buy(&self, request: TicketPurchase) -> Result<PurchaseOutcome> {
        require_fields(&[
            ("username", !request.username.is_empty()),
            ("password", !request.password.is_empty()),
            ("eventName", !request.event_name.is_empty()),
            ("quantity", request.quantity.is_some()),
        ])?;
        let quantity = positive_count("quantity", request.quantity)?;

        let buyer = self
            .users
            .authenticate(&request.username, &request.password)
            .await?;

        let _events_guard = self.locks.acquire(collections::EVENTS).await;
        let mut events = self.events.read_all().await?;

        let Some(index) = events
            .iter()
            .position(|e| names_match(&e.event_name, &request.event_name))
        else {
            metrics::record_purchase_rejected();
            tracing::warn!(event = %request.event_name, "Purchase rejected: event not found");
            return Err(DomainError::not_found("Event", &request.event_name));
        };

        let available = events[index].tickets_for_sale;
        if quantity > available {
            metrics::record_purchase_rejected();
            tracing::warn!(
                event = %events[index].event_name,
                available,
                requested = quantity,
                "Purchase rejected: not enough tickets"
            );
            return Err(DomainError::business_rule(format!(
                "Not enough tickets. Available: {available}, Requested: {quantity}"
            )));
        }

        let before = events.clone();
        let remaining = available - quantity;
        events[index].tickets_for_sale = remaining;
        let event_name = events[index].event_name.clone();
        self.events.write_all(&events).await?;

        let receipt = Receipt::new(buyer.username, event_name, quantity);
        if let Err(e) = self.append_receipt(receipt.clone()).await {
            match self.events.write_all(&before).await {
                Ok(()) => tracing::error!(
                    event = %receipt.event_name,
                    quantity,
                    error = %e,
                    "Receipt write failed, inventory restored"
                ),
                Err(restore) => tracing::error!(
                    event = %receipt.event_name,
                    quantity,
                    error = %e,
                    restore_error = %restore,
                    "Receipt write failed and inventory could not be restored; tickets lost"
                ),
            }
            return Err(e);
        }

        metrics::record_tickets_sold(&receipt.event_name, quantity, remaining);
        tracing::info!(
            user = %receipt.user_name,
            event = %receipt.event_name,
            quantity,
            remaining,
            "Tickets purchased"
        );

        Ok(PurchaseOutcome {
            receipt,
            remaining_tickets: remaining,
        })
    }

    async fn append_receipt(&self, receipt: Receipt) -> Result<()> {
        let _guard = self.locks.acquire(collections::RECEIPTS).await;
        let mut receipts = self.receipts.read_all().await?;
        receipts.push(receipt);
        self.receipts.write_all(&receipts).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use boxoffice_core::types::User;
    use boxoffice_testing::fixtures::SeededStore;
    use boxoffice_testing::{FailingStore, Fixture};

    async fn seeded(tickets: u32) -> SeededStore {
        Fixture::new()
            .with_users(vec![User::new("bob", "pw")])
            .with_events(vec![
                Event::new("Concert", tickets, "alice"),
                Event::new("Opera", 50, "alice"),
            ])
            .build()
            .await
            .unwrap()
    }

    fn service_over(store: Arc<dyn CollectionStore>, locks: &CollectionLocks) -> TicketService {
        let users = UserService::new(Arc::clone(&store), locks.clone());
        TicketService::new(store, locks.clone(), users)
    }

    async fn setup(tickets: u32) -> (TicketService, SeededStore) {
        let fixture = seeded(tickets).await;
        let service = service_over(Arc::clone(&fixture.store), &fixture.locks);
        (service, fixture)
    }

    fn purchase(event_name: &str, quantity: i64) -> TicketPurchase {
        TicketPurchase {
            username: "bob".to_string(),
            password: "pw".to_string(),
            event_name: event_name.to_string(),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_purchase_decrements_and_records_one_receipt() {
        let (tickets, fixture) = setup(10).await;

        let outcome = tickets.buy(purchase("concert", 3)).await.unwrap();

        assert_eq!(outcome.remaining_tickets, 7);
        assert_eq!(outcome.receipt, Receipt::new("bob", "Concert", 3));
        assert_eq!(fixture.receipts().await.unwrap(), vec![outcome.receipt]);

        let events = fixture.events().await.unwrap();
        assert_eq!(events[0].tickets_for_sale, 7);
        assert_eq!(events[1].tickets_for_sale, 50);
    }

    #[tokio::test]
    async fn test_buying_every_ticket_leaves_zero() {
        let (tickets, fixture) = setup(4).await;

        let outcome = tickets.buy(purchase("Concert", 4)).await.unwrap();

        assert_eq!(outcome.remaining_tickets, 0);
        assert_eq!(fixture.events().await.unwrap()[0].tickets_for_sale, 0);
    }

    #[tokio::test]
    async fn test_oversell_is_rejected_without_side_effects() {
        let (tickets, fixture) = setup(2).await;

        let err = tickets.buy(purchase("Concert", 3)).await.unwrap_err();

        assert_eq!(
            err,
            DomainError::business_rule("Not enough tickets. Available: 2, Requested: 3")
        );
        assert_eq!(fixture.events().await.unwrap()[0].tickets_for_sale, 2);
        assert!(fixture.receipts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let (tickets, _fixture) = setup(2).await;

        let err = tickets.buy(purchase("Ballet", 1)).await.unwrap_err();

        assert_eq!(err, DomainError::not_found("Event", "Ballet"));
    }

    #[tokio::test]
    async fn test_bad_credentials_are_denied() {
        let (tickets, fixture) = setup(2).await;

        let mut req = purchase("Concert", 1);
        req.password = "PW".to_string();

        assert_eq!(tickets.buy(req).await.unwrap_err(), DomainError::Unauthorized);
        assert!(fixture.receipts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quantity_must_be_positive() {
        let (tickets, _fixture) = setup(2).await;

        let err = tickets.buy(purchase("Concert", 0)).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_failed_receipt_write_restores_inventory() {
        let fixture = seeded(10).await;
        let store = FailingStore::new(Arc::clone(&fixture.store)).fail_saves(collections::RECEIPTS);
        let tickets = service_over(Arc::new(store), &fixture.locks);

        let err = tickets.buy(purchase("Concert", 3)).await.unwrap_err();

        assert_eq!(err, DomainError::storage("receipts disk full"));
        assert_eq!(fixture.events().await.unwrap()[0].tickets_for_sale, 10);
        assert!(fixture.receipts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_restore_still_reports_receipt_error() {
        let fixture = seeded(10).await;
        let store = FailingStore::new(Arc::clone(&fixture.store))
            .fail_saves(collections::RECEIPTS)
            .fail_saves_after(collections::EVENTS, 1);
        let tickets = service_over(Arc::new(store), &fixture.locks);

        let err = tickets.buy(purchase("Concert", 3)).await.unwrap_err();

        assert_eq!(err, DomainError::storage("receipts disk full"));
        // the decrement stuck; only the log records the lost tickets
        assert_eq!(fixture.events().await.unwrap()[0].tickets_for_sale, 7);
        assert!(fixture.receipts().await.unwrap().is_empty());
    }
}
