//! Per-user purchase reporting.

use boxoffice_core::types::{PurchaseSummary, Receipt, collections};
use boxoffice_core::{Collection, CollectionStore, DomainError, Result};
use std::sync::Arc;

/// Reads receipts and summarizes them per user.
#[derive(Clone, Debug)]
pub struct ReceiptService {
    receipts: Collection<Receipt>,
}

impl ReceiptService {
    /// Create a receipt service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            receipts: Collection::new(store, collections::RECEIPTS),
        }
    }

    /// Summarize every receipt whose `userName` equals `username` exactly.
    ///
    /// A user without receipts gets an all-zero summary.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if `username` is empty
    /// - [`DomainError::Storage`] if the collection cannot be read
    pub async fn summary(&self, username: &str) -> Result<PurchaseSummary> {
        if username.is_empty() {
            return Err(DomainError::validation("username is required"));
        }

        let receipts = self.receipts.read_all().await?;
        let summary =
            PurchaseSummary::from_receipts(receipts.iter().filter(|r| r.user_name == username));

        tracing::debug!(username, purchases = summary.total_tickets_bought, "Summary computed");
        Ok(summary)
    }
}
