//! Product inventory endpoints under `/api/products`.
//!
//! - GET / - list with `category`, `inStock`, `search`, `sortBy` filters
//! - GET /stats - inventory statistics
//! - GET /search?q= - name search
//! - GET /category/:category - products in one category
//! - GET /:id, PUT /:id, DELETE /:id
//! - POST / - create
//! - POST /:id/purchase, POST /:id/restock - body `{"quantity": n}`

use super::{DataResponse, ListResponse};
use crate::server::state::AppState;
use crate::services::products::{InventoryStats, ProductSale, Restock, parse_id};
use crate::services::{NewProduct, ProductFilters, ProductUpdate};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use boxoffice_core::types::Product;
use boxoffice_web::{JsonBody, WebResult};
use serde::Deserialize;

/// Query for `/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search term
    pub q: Option<String>,
}

/// Body for purchase and restock.
#[derive(Debug, Default, Deserialize)]
pub struct QuantityRequest {
    /// Units to buy or add
    pub quantity: Option<i64>,
}

/// List products.
pub async fn list_products(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilters>,
) -> WebResult<Json<ListResponse<Product>>> {
    Ok(Json(state.services.products.list(&filters).await?.into()))
}

/// Inventory statistics.
pub async fn product_stats(
    State(state): State<AppState>,
) -> WebResult<Json<DataResponse<InventoryStats>>> {
    Ok(Json(DataResponse::new(state.services.products.stats().await?)))
}

/// Search products by name.
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> WebResult<Json<ListResponse<Product>>> {
    let term = query.q.unwrap_or_default();
    Ok(Json(state.services.products.search(&term).await?.into()))
}

/// Products in one category.
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> WebResult<Json<ListResponse<Product>>> {
    Ok(Json(state.services.products.by_category(&category).await?.into()))
}

/// One product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<DataResponse<Product>>> {
    let id = parse_id(&id)?;
    Ok(Json(DataResponse::new(state.services.products.get(id).await?)))
}

/// Create a product.
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewProduct>,
) -> WebResult<(StatusCode, Json<DataResponse<Product>>)> {
    let created = state.services.products.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(
            DataResponse::new(created.value)
                .with_message("Product created successfully")
                .with_warnings(created.warnings),
        ),
    ))
}

/// Update some fields of a product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<ProductUpdate>,
) -> WebResult<Json<DataResponse<Product>>> {
    let id = parse_id(&id)?;
    let product = state.services.products.update(id, update).await?;

    Ok(Json(
        DataResponse::new(product).with_message("Product updated successfully"),
    ))
}

/// Delete a product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<DataResponse<Product>>> {
    let id = parse_id(&id)?;
    let deleted = state.services.products.delete(id).await?;

    Ok(Json(
        DataResponse::new(deleted.value)
            .with_message("Product deleted successfully")
            .with_warnings(deleted.warnings),
    ))
}

/// Buy units of a product.
pub async fn purchase_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<QuantityRequest>,
) -> WebResult<Json<DataResponse<ProductSale>>> {
    let id = parse_id(&id)?;
    let sale = state.services.products.purchase(id, request.quantity).await?;

    Ok(Json(
        DataResponse::new(sale.value)
            .with_message("Purchase completed successfully")
            .with_warnings(sale.warnings),
    ))
}

/// Add units to a product.
pub async fn restock_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<QuantityRequest>,
) -> WebResult<Json<DataResponse<Restock>>> {
    let id = parse_id(&id)?;
    let restock = state.services.products.restock(id, request.quantity).await?;

    Ok(Json(
        DataResponse::new(restock).with_message("Product restocked successfully"),
    ))
}
