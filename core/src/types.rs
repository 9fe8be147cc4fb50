//! Record shapes for every collection.
//!
//! Field names serialize in camelCase; the same shape is used on the wire and
//! on disk, so a collection document can be edited by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection names as stored by a [`CollectionStore`](crate::CollectionStore).
pub mod collections {
    /// Registered users.
    pub const USERS: &str = "users";
    /// Events with remaining ticket inventory.
    pub const EVENTS: &str = "events";
    /// Append-only purchase receipts.
    pub const RECEIPTS: &str = "receipts";
    /// Product inventory.
    pub const PRODUCTS: &str = "products";
    /// Comments (read-only here; written by a separate service).
    pub const COMMENTS: &str = "comments";
    /// Member directory.
    pub const MEMBERS: &str = "members";
}

/// Case-insensitive name comparison used for every uniqueness and lookup rule.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A registered user. Credentials are stored and compared as plain text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name, unique case-insensitively
    pub username: String,
    /// Password, compared verbatim
    pub password: String,
}

impl User {
    /// Creates a new user record
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true when both username and password match exactly
    #[must_use]
    pub fn has_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// An event with tickets for sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event name, unique case-insensitively
    pub event_name: String,
    /// Remaining tickets; decremented on purchase
    pub tickets_for_sale: u32,
    /// Username of the creator
    pub created_by: String,
}

impl Event {
    /// Creates a new event record
    #[must_use]
    pub fn new(
        event_name: impl Into<String>,
        tickets_for_sale: u32,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            tickets_for_sale,
            created_by: created_by.into(),
        }
    }
}

/// Append-only record of a completed ticket purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Buyer
    pub user_name: String,
    /// Event the tickets were bought for
    pub event_name: String,
    /// Number of tickets bought
    pub tickets_bought: u32,
}

impl Receipt {
    /// Creates a new receipt
    #[must_use]
    pub fn new(user_name: impl Into<String>, event_name: impl Into<String>, tickets_bought: u32) -> Self {
        Self {
            user_name: user_name.into(),
            event_name: event_name.into(),
            tickets_bought,
        }
    }
}

/// Per-user purchase report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    /// Number of purchases (receipts) the user made
    pub total_tickets_bought: usize,
    /// Sum of tickets over all receipts
    pub tickets_sum: u64,
    /// Event name of each receipt, in purchase order
    pub events: Vec<String>,
    /// `tickets_sum / total_tickets_bought`, or 0 when there are no receipts
    pub average_tickets_per_event: f64,
}

impl PurchaseSummary {
    /// Summarize the given receipts.
    ///
    /// A user with no receipts gets an all-zero summary instead of a division by zero.
    #[must_use]
    pub fn from_receipts<'a>(receipts: impl IntoIterator<Item = &'a Receipt>) -> Self {
        let mut events = Vec::new();
        let mut tickets_sum: u64 = 0;
        for receipt in receipts {
            tickets_sum += u64::from(receipt.tickets_bought);
            events.push(receipt.event_name.clone());
        }

        let count = events.len();
        #[allow(clippy::cast_precision_loss)]
        let average_tickets_per_event = if count == 0 {
            0.0
        } else {
            tickets_sum as f64 / count as f64
        };

        Self {
            total_tickets_bought: count,
            tickets_sum,
            events,
            average_tickets_per_event,
        }
    }
}

/// An inventory item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Generated identifier (max existing + 1)
    pub id: u64,
    /// Product name, unique case-insensitively
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub stock: u32,
    /// Free-form category
    pub category: String,
    /// When the product was created
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns true when the product has between 1 and `LOW_STOCK_THRESHOLD` units.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock <= LOW_STOCK_THRESHOLD
    }
}

/// Stock level at or below which a product is reported as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// An entry of the member directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Generated identifier (max existing + 1)
    pub id: u64,
    /// Display name
    pub name: String,
    /// Lowercased email, unique
    pub email: String,
    /// Age in years, 0..=150
    pub age: Option<u8>,
    /// Home city
    pub city: Option<String>,
    /// When the member was created
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}
