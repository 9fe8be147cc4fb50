//! Services: validation, business rules and persistence for each collection.
//!
//! Every mutation follows the same sequence while holding the collection's
//! guard: load the whole collection, check the rules, mutate in memory, write
//! the whole collection back, log the outcome.
//!
//! Handlers never touch storage directly; they call into these services and
//! map the returned [`DomainError`](boxoffice_core::DomainError) to a response.

pub mod comments;
pub mod events;
pub mod members;
pub mod products;
pub mod receipts;
pub mod tickets;
pub mod users;

pub use comments::CommentService;
pub use events::{EventService, NewEvent};
pub use members::{MemberFilters, MemberService, MemberUpdate, NewMember};
pub use products::{NewProduct, ProductFilters, ProductService, ProductUpdate};
pub use receipts::ReceiptService;
pub use tickets::{PurchaseOutcome, TicketPurchase, TicketService};
pub use users::UserService;

use boxoffice_core::environment::Clock;
use boxoffice_core::{CollectionLocks, CollectionStore, DomainError, Result};
use std::sync::Arc;

/// Every service, wired to one store and one lock registry.
#[derive(Clone)]
pub struct Services {
    /// Registration and authentication
    pub users: UserService,
    /// Event creation and listing
    pub events: EventService,
    /// Ticket purchases
    pub tickets: TicketService,
    /// Purchase summaries
    pub receipts: ReceiptService,
    /// Product inventory
    pub products: ProductService,
    /// Member directory
    pub members: MemberService,
    /// Read-only comments
    pub comments: CommentService,
}

impl Services {
    /// Build every service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, locks: CollectionLocks, clock: Arc<dyn Clock>) -> Self {
        let users = UserService::new(Arc::clone(&store), locks.clone());
        Self {
            events: EventService::new(Arc::clone(&store), locks.clone(), users.clone()),
            tickets: TicketService::new(Arc::clone(&store), locks.clone(), users.clone()),
            receipts: ReceiptService::new(Arc::clone(&store)),
            products: ProductService::new(Arc::clone(&store), locks.clone(), Arc::clone(&clock)),
            members: MemberService::new(Arc::clone(&store), locks, clock),
            comments: CommentService::new(store),
            users,
        }
    }
}

/// Reject the request if any listed field is missing.
///
/// Each entry is `(field name, present)`.
pub(crate) fn require_fields(fields: &[(&str, bool)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Validate a count supplied by a client: present, positive, and within `u32`.
pub(crate) fn positive_count(field: &str, value: Option<i64>) -> Result<u32> {
    let value = value.ok_or_else(|| DomainError::validation(format!("{field} is required")))?;
    if value <= 0 {
        return Err(DomainError::validation(format!(
            "{field} must be a positive integer"
        )));
    }
    u32::try_from(value)
        .map_err(|_| DomainError::validation(format!("{field} is too large")))
}

/// Next integer id for a collection: one past the largest id in use.
pub(crate) fn next_id(collection: &str, ids: impl Iterator<Item = u64>) -> Result<u64> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| DomainError::storage(format!("collection '{collection}' has no free id")))
}
