//! Shared handlers.

pub mod fallback;

pub use fallback::route_not_found;
