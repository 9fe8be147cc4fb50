//! Demo inventory written on first start.

use crate::services::ProductService;
use boxoffice_core::types::Product;
use boxoffice_core::{DateTime, Result, Utc};

/// The demo catalog, stamped with `now`.
#[must_use]
pub fn demo_products(now: DateTime<Utc>) -> Vec<Product> {
    [
        (1, "Laptop", 999.99, 10, "Electronics"),
        (2, "Mouse", 29.99, 50, "Electronics"),
        (3, "Desk Chair", 199.99, 5, "Furniture"),
        (4, "Monitor", 349.99, 0, "Electronics"),
    ]
    .into_iter()
    .map(|(id, name, price, stock, category)| Product {
        id,
        name: name.to_string(),
        price,
        stock,
        category: category.to_string(),
        created_at: now,
    })
    .collect()
}

/// Write the demo catalog unless a products collection already exists.
///
/// # Errors
///
/// Returns a storage error if the products collection cannot be read or written.
pub async fn seed_demo_products(products: &ProductService) -> Result<()> {
    if products.seed_if_absent(&demo_products(products.now())).await? {
        tracing::info!("Seeded demo products");
    } else {
        tracing::debug!("Products collection present, skipping demo seed");
    }
    Ok(())
}
