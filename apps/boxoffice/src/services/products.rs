//! Product inventory: CRUD, purchases, restocking and reporting.
//!
//! Warnings (low stock, zero stock, deleting stocked items) are informational
//! and returned next to the record; they never fail the request.

use super::next_id;
use boxoffice_core::environment::Clock;
use boxoffice_core::types::{Product, collections, names_match};
use boxoffice_core::{Collection, CollectionLocks, CollectionStore, DomainError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Highest accepted unit price.
pub const MAX_PRICE: f64 = 99_999.99;

/// Highest stock a restock may reach.
pub const MAX_STOCK: u32 = 10_000;

const NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=100;

/// Query filters for listing products.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    /// Category, matched case-insensitively
    pub category: Option<String>,
    /// `"true"` keeps stocked products, `"false"` keeps sold-out ones
    pub in_stock: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    /// `price-asc`, `price-desc` or `name`
    pub sort_by: Option<String>,
}

/// Fields for a new product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProduct {
    /// Product name
    pub name: Option<String>,
    /// Unit price
    pub price: Option<f64>,
    /// Initial stock
    pub stock: Option<i64>,
    /// Category
    pub category: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,
    /// New unit price
    pub price: Option<f64>,
    /// New stock level
    pub stock: Option<i64>,
    /// New category
    pub category: Option<String>,
}

/// A product together with informational warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct WithWarnings<T> {
    /// The affected record
    pub value: T,
    /// Human-readable warnings, possibly empty
    pub warnings: Vec<String>,
}

/// Result of a product purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSale {
    /// Product after the stock was reduced
    pub product: Product,
    /// Units bought
    pub quantity: u32,
    /// `price * quantity`, rounded to cents
    pub total_price: f64,
}

/// Result of a restock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restock {
    /// Product after the stock was raised
    pub product: Product,
    /// Units added
    pub added: u32,
    /// Stock after the restock
    pub new_total: u32,
}

/// Number of products in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category as stored
    pub category: String,
    /// Products in that category
    pub count: usize,
}

/// Inventory-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    /// Number of products
    pub total_products: usize,
    /// Products with stock > 0
    pub in_stock_products: usize,
    /// Products with stock == 0
    pub out_of_stock_products: usize,
    /// Products running low (1..=5 units)
    pub low_stock_products: usize,
    /// Sum of `price * stock`, rounded to cents
    pub total_inventory_value: f64,
    /// Sum of stock
    pub total_stock_units: u64,
    /// Mean unit price, rounded to cents; 0 without products
    pub average_price: f64,
    /// Product count per category, in first-seen order
    pub categories: Vec<CategoryCount>,
}

/// Manages the product inventory.
#[derive(Clone)]
pub struct ProductService {
    products: Collection<Product>,
    locks: CollectionLocks,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("products", &self.products)
            .finish_non_exhaustive()
    }
}

impl ProductService {
    /// Create a product service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, locks: CollectionLocks, clock: Arc<dyn Clock>) -> Self {
        Self {
            products: Collection::new(store, collections::PRODUCTS),
            locks,
            clock,
        }
    }

    /// List products, filtered and sorted.
    ///
    /// Unknown `inStock` or `sortBy` values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the collection cannot be read.
    pub async fn list(&self, filters: &ProductFilters) -> Result<Vec<Product>> {
        let mut products = self.products.read_all().await?;

        if let Some(category) = filters.category.as_deref().filter(|c| !c.is_empty()) {
            products.retain(|p| names_match(&p.category, category));
        }

        match filters.in_stock.as_deref() {
            Some("true") => products.retain(|p| p.stock > 0),
            Some("false") => products.retain(|p| p.stock == 0),
            _ => {}
        }

        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            products.retain(|p| p.name.to_lowercase().contains(&needle));
        }

        match filters.sort_by.as_deref() {
            Some("price-asc") => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            Some("price-desc") => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            Some("name") => products.sort_by_key(|p| p.name.to_lowercase()),
            _ => {}
        }

        Ok(products)
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if no product has that id
    /// - [`DomainError::Storage`] if the collection cannot be read
    pub async fn get(&self, id: u64) -> Result<Product> {
        self.products
            .read_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    /// Create a product with the next free id.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if a field is missing or out of range
    /// - [`DomainError::Conflict`] if the name is taken (case-insensitively)
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn create(&self, input: NewProduct) -> Result<WithWarnings<Product>> {
        let (Some(name), Some(price), Some(stock), Some(category)) = (
            input.name.as_deref().map(str::trim).filter(|n| !n.is_empty()),
            input.price,
            input.stock,
            input.category.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        ) else {
            return Err(DomainError::validation(
                "Name, price, stock, and category are required",
            ));
        };

        validate_name(name)?;
        validate_price(price)?;
        let stock = validate_stock(stock)?;

        let _guard = self.locks.acquire(collections::PRODUCTS).await;
        let mut products = self.products.read_all().await?;
        ensure_unique_name(&products, name, None)?;

        let mut warnings = Vec::new();
        if stock == 0 {
            warnings.push("Product created with zero stock".to_string());
        }

        let product = Product {
            id: next_id(collections::PRODUCTS, products.iter().map(|p| p.id))?,
            name: name.to_string(),
            price,
            stock,
            category: category.to_string(),
            created_at: self.clock.now(),
        };
        products.push(product.clone());
        self.products.write_all(&products).await?;

        tracing::info!(id = product.id, name = %product.name, stock, "Product created");
        Ok(WithWarnings {
            value: product,
            warnings,
        })
    }

    /// Apply a partial update. Id and creation time never change.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if no product has that id
    /// - [`DomainError::Validation`] if a supplied field is out of range
    /// - [`DomainError::Conflict`] if the new name belongs to another product
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn update(&self, id: u64, update: ProductUpdate) -> Result<Product> {
        let _guard = self.locks.acquire(collections::PRODUCTS).await;
        let mut products = self.products.read_all().await?;
        let index = position(&products, id)?;

        let name = update.name.as_deref().map(str::trim);
        if let Some(name) = name {
            validate_name(name)?;
            ensure_unique_name(&products, name, Some(id))?;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
        }
        let stock = update.stock.map(validate_stock).transpose()?;
        let category = update.category.as_deref().map(str::trim);
        if category.is_some_and(str::is_empty) {
            return Err(DomainError::validation("Category cannot be empty"));
        }

        let product = &mut products[index];
        if let Some(name) = name {
            product.name = name.to_string();
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(stock) = stock {
            product.stock = stock;
        }
        if let Some(category) = category {
            product.category = category.to_string();
        }
        let product = product.clone();
        self.products.write_all(&products).await?;

        tracing::info!(id, "Product updated");
        Ok(product)
    }

    /// Remove a product, warning when it still had stock.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if no product has that id
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn delete(&self, id: u64) -> Result<WithWarnings<Product>> {
        let _guard = self.locks.acquire(collections::PRODUCTS).await;
        let mut products = self.products.read_all().await?;
        let index = position(&products, id)?;

        let product = products.remove(index);
        self.products.write_all(&products).await?;

        let mut warnings = Vec::new();
        if product.stock > 0 {
            warnings.push(format!(
                "Deleting product with {} items in stock",
                product.stock
            ));
        }

        tracing::info!(id, name = %product.name, "Product deleted");
        Ok(WithWarnings {
            value: product,
            warnings,
        })
    }

    /// Sell `quantity` units.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if `quantity` is not positive
    /// - [`DomainError::NotFound`] if no product has that id
    /// - [`DomainError::BusinessRule`] if fewer units are in stock than requested
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn purchase(&self, id: u64, quantity: Option<i64>) -> Result<WithWarnings<ProductSale>> {
        let quantity = positive_quantity(quantity)?;

        let _guard = self.locks.acquire(collections::PRODUCTS).await;
        let mut products = self.products.read_all().await?;
        let index = position(&products, id)?;

        let product = &mut products[index];
        if product.stock < quantity {
            tracing::warn!(id, available = product.stock, requested = quantity, "Product purchase rejected");
            return Err(DomainError::business_rule(format!(
                "Insufficient stock. Available: {}, Requested: {quantity}",
                product.stock
            )));
        }

        product.stock -= quantity;
        let total_price = round_cents(product.price * f64::from(quantity));
        let product = product.clone();
        self.products.write_all(&products).await?;

        let mut warnings = Vec::new();
        if product.is_low_stock() {
            warnings.push(format!(
                "Low stock warning: Only {} items remaining",
                product.stock
            ));
        } else if product.stock == 0 {
            warnings.push("Product is now out of stock".to_string());
        }

        crate::metrics::record_product_purchased(quantity);
        tracing::info!(id, quantity, total_price, remaining = product.stock, "Product purchased");
        Ok(WithWarnings {
            value: ProductSale {
                product,
                quantity,
                total_price,
            },
            warnings,
        })
    }

    /// Add `quantity` units, up to [`MAX_STOCK`].
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if `quantity` is not positive
    /// - [`DomainError::NotFound`] if no product has that id
    /// - [`DomainError::BusinessRule`] if the new stock would exceed [`MAX_STOCK`]
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn restock(&self, id: u64, quantity: Option<i64>) -> Result<Restock> {
        let quantity = positive_quantity(quantity)?;

        let _guard = self.locks.acquire(collections::PRODUCTS).await;
        let mut products = self.products.read_all().await?;
        let index = position(&products, id)?;

        let product = &mut products[index];
        let new_total = product
            .stock
            .checked_add(quantity)
            .filter(|total| *total <= MAX_STOCK)
            .ok_or_else(|| DomainError::business_rule("Stock cannot exceed 10,000 units"))?;

        product.stock = new_total;
        let product = product.clone();
        self.products.write_all(&products).await?;

        tracing::info!(id, added = quantity, new_total, "Product restocked");
        Ok(Restock {
            product,
            added: quantity,
            new_total,
        })
    }

    /// Inventory-wide statistics.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the collection cannot be read.
    pub async fn stats(&self) -> Result<InventoryStats> {
        let products = self.products.read_all().await?;

        let mut categories: Vec<CategoryCount> = Vec::new();
        for product in &products {
            match categories.iter_mut().find(|c| c.category == product.category) {
                Some(entry) => entry.count += 1,
                None => categories.push(CategoryCount {
                    category: product.category.clone(),
                    count: 1,
                }),
            }
        }

        let total_inventory_value: f64 = products
            .iter()
            .map(|p| p.price * f64::from(p.stock))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let average_price = if products.is_empty() {
            0.0
        } else {
            products.iter().map(|p| p.price).sum::<f64>() / products.len() as f64
        };

        Ok(InventoryStats {
            total_products: products.len(),
            in_stock_products: products.iter().filter(|p| p.stock > 0).count(),
            out_of_stock_products: products.iter().filter(|p| p.stock == 0).count(),
            low_stock_products: products.iter().filter(|p| p.is_low_stock()).count(),
            total_inventory_value: round_cents(total_inventory_value),
            total_stock_units: products.iter().map(|p| u64::from(p.stock)).sum(),
            average_price: round_cents(average_price),
            categories,
        })
    }

    /// Products in one category (case-insensitive).
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if `category` is blank
    /// - [`DomainError::NotFound`] if the category has no products
    /// - [`DomainError::Storage`] if the collection cannot be read
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>> {
        let category = category.trim();
        if category.is_empty() {
            return Err(DomainError::validation("Category is required"));
        }

        let products: Vec<Product> = self
            .products
            .read_all()
            .await?
            .into_iter()
            .filter(|p| names_match(&p.category, category))
            .collect();

        if products.is_empty() {
            return Err(DomainError::NotFound(format!(
                "No products found in category: {category}"
            )));
        }
        Ok(products)
    }

    /// Products whose name contains `term` (case-insensitive).
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if the trimmed term is shorter than 2 characters
    /// - [`DomainError::Storage`] if the collection cannot be read
    pub async fn search(&self, term: &str) -> Result<Vec<Product>> {
        let term = term.trim();
        if term.chars().count() < 2 {
            return Err(DomainError::validation(
                "Search term must be at least 2 characters",
            ));
        }

        let needle = term.to_lowercase();
        Ok(self
            .products
            .read_all()
            .await?
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Write `products` only if the collection has never been written.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the collection cannot be read or written.
    pub async fn seed_if_absent(&self, products: &[Product]) -> Result<bool> {
        let _guard = self.locks.acquire(collections::PRODUCTS).await;
        if self.products.exists().await? {
            return Ok(false);
        }
        self.products.write_all(products).await?;
        Ok(true)
    }

    /// Current time from the injected clock.
    #[must_use]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}

/// Parse a product id path segment: a positive integer.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for anything else.
pub fn parse_id(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| DomainError::validation("Invalid product ID"))
}

fn position(products: &[Product], id: u64) -> Result<usize> {
    products
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| DomainError::not_found("Product", id))
}

fn validate_name(name: &str) -> Result<()> {
    if NAME_LENGTH.contains(&name.chars().count()) {
        Ok(())
    } else {
        Err(DomainError::validation(
            "Product name must be between 3 and 100 characters",
        ))
    }
}

fn ensure_unique_name(products: &[Product], name: &str, except: Option<u64>) -> Result<()> {
    let taken = products
        .iter()
        .any(|p| Some(p.id) != except && names_match(&p.name, name));
    if taken {
        Err(DomainError::conflict("Product with this name already exists"))
    } else {
        Ok(())
    }
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(DomainError::validation("Price must be greater than 0"));
    }
    if price > MAX_PRICE {
        return Err(DomainError::validation("Price cannot exceed $99,999.99"));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> Result<u32> {
    if stock < 0 {
        return Err(DomainError::validation("Stock cannot be negative"));
    }
    u32::try_from(stock).map_err(|_| DomainError::validation("Stock is too large"))
}

fn positive_quantity(quantity: Option<i64>) -> Result<u32> {
    match quantity {
        Some(q) if q > 0 => {
            u32::try_from(q).map_err(|_| DomainError::validation("Quantity is too large"))
        }
        _ => Err(DomainError::validation("Quantity must be greater than 0")),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
