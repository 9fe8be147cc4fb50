//! Business metrics for the box office.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `boxoffice_users_registered_total` - Users registered
//! - `boxoffice_events_created_total` - Events created
//! - `boxoffice_tickets_sold_total` - Tickets sold across all events
//! - `boxoffice_purchases_total{status}` - Ticket purchases by outcome (completed, rejected)
//! - `boxoffice_products_purchased_total` - Product units sold
//!
//! ## Gauges
//! - `boxoffice_tickets_available{event}` - Remaining tickets per event
//!
//! Recording is a no-op until a recorder is installed, so services call these
//! unconditionally and tests need no setup.

use metrics::{describe_counter, describe_gauge};

/// Register all business metric descriptions.
///
/// Call once at startup, after the exporter is installed.
pub fn register_business_metrics() {
    describe_counter!(
        "boxoffice_users_registered_total",
        "Total number of registered users"
    );
    describe_counter!(
        "boxoffice_events_created_total",
        "Total number of events created"
    );
    describe_counter!(
        "boxoffice_tickets_sold_total",
        "Total number of tickets sold"
    );
    describe_counter!(
        "boxoffice_purchases_total",
        "Total number of ticket purchases by status (completed, rejected)"
    );
    describe_counter!(
        "boxoffice_products_purchased_total",
        "Total number of product units sold"
    );
    describe_gauge!(
        "boxoffice_tickets_available",
        "Current number of tickets for sale per event"
    );

    tracing::info!("Business metrics registered");
}

/// Record a new user.
pub fn record_user_registered() {
    metrics::counter!("boxoffice_users_registered_total").increment(1);
}

/// Record a new event and its initial inventory.
pub fn record_event_created(event_name: &str, tickets_for_sale: u32) {
    metrics::counter!("boxoffice_events_created_total").increment(1);
    metrics::gauge!("boxoffice_tickets_available", "event" => event_name.to_string())
        .set(f64::from(tickets_for_sale));
}

/// Record a completed ticket purchase.
pub fn record_tickets_sold(event_name: &str, quantity: u32, remaining: u32) {
    metrics::counter!("boxoffice_purchases_total", "status" => "completed").increment(1);
    metrics::counter!("boxoffice_tickets_sold_total").increment(u64::from(quantity));
    metrics::gauge!("boxoffice_tickets_available", "event" => event_name.to_string())
        .set(f64::from(remaining));
    tracing::debug!(event = event_name, quantity, remaining, "Recorded tickets_sold metric");
}

/// Record a ticket purchase rejected after authentication.
pub fn record_purchase_rejected() {
    metrics::counter!("boxoffice_purchases_total", "status" => "rejected").increment(1);
}

/// Record product units sold.
pub fn record_product_purchased(quantity: u32) {
    metrics::counter!("boxoffice_products_purchased_total").increment(u64::from(quantity));
}
