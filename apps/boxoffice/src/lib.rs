//! # Box Office
//!
//! Users, events, ticket purchases and a product inventory served over HTTP,
//! with every collection stored as one JSON document.
//!
//! ## Architecture
//!
//! - `services`: validation and business rules; each mutation is a locked
//!   load, check, mutate, write sequence over one collection
//! - `api`: thin axum handlers mapping HTTP to services
//! - `server`: application state and router
//! - `config`: environment-driven configuration
//! - `metrics`: business counters and gauges
//! - `seed`: demo inventory for a fresh data directory
//!
//! ## Quick start
//!
//! ```ignore
//! let store: Arc<dyn CollectionStore> = Arc::new(JsonFileStore::new("data"));
//! let state = AppState::with_system_clock(store);
//! seed::seed_demo_products(&state.services.products).await?;
//! axum::serve(listener, build_router(state)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // handlers return WebResult; errors are the AppError mapping

pub mod api;
pub mod config;
pub mod metrics;
pub mod seed;
pub mod server;
pub mod services;

pub use config::{Config, ConfigError, StorageBackend};
pub use server::{AppState, build_router};
pub use services::Services;
