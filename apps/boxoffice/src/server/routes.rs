//! Router configuration.

use super::health::{banner, health_check};
use super::state::AppState;
use crate::api::{comments, events, members, products, users};
use axum::{
    Router,
    routing::{get, post},
};
use boxoffice_web::correlation_id_layer;
use boxoffice_web::handlers::route_not_found;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// Unknown routes answer 404 with the standard error body. Every request gets
/// a correlation ID, a trace span and permissive CORS headers.
pub fn build_router(state: AppState) -> Router {
    let product_routes = Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route("/stats", get(products::product_stats))
        .route("/search", get(products::search_products))
        .route("/category/:category", get(products::products_by_category))
        .route(
            "/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/:id/purchase", post(products::purchase_product))
        .route("/:id/restock", post(products::restock_product));

    let member_routes = Router::new()
        .route("/", get(members::list_members).post(members::create_member))
        .route("/stats", get(members::member_stats))
        .route(
            "/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        );

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        // Users and tickets
        .route("/users/register", post(users::register))
        .route("/users/tickets/buy", post(users::buy_tickets))
        .route("/users/:username/summary", get(users::summary))
        // Events
        .route("/events", get(events::list_events))
        .route("/events/creator", post(events::create_event))
        .route("/comments", get(comments::list_comments))
        .nest("/api/products", product_routes)
        .nest("/api/members", member_routes)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(correlation_id_layer())
        .with_state(state)
}
