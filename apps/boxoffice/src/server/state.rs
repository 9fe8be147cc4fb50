//! Application state for the HTTP server.

use crate::services::Services;
use boxoffice_core::environment::{Clock, SystemClock};
use boxoffice_core::{CollectionLocks, CollectionStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every service inside is a set of `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Every service, sharing one store and one lock registry
    pub services: Services,
}

impl AppState {
    /// Create application state over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            services: Services::new(store, CollectionLocks::new(), clock),
        }
    }

    /// Application state using the system clock.
    #[must_use]
    pub fn with_system_clock(store: Arc<dyn CollectionStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }
}
