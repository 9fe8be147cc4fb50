//! # Box Office Testing
//!
//! Testing utilities for the box office services.
//!
//! This crate provides:
//! - `FixedClock`: deterministic time
//! - Fixtures that pre-populate an in-memory store
//! - `FailingStore`: a store that rejects writes to chosen collections
//!
//! ## Example
//!
//! ```
//! use boxoffice_testing::fixtures::Fixture;
//! use boxoffice_core::types::{Event, User};
//!
//! # async fn example() -> Result<(), boxoffice_core::DomainError> {
//! let fixture = Fixture::new()
//!     .with_users(vec![User::new("alice", "secret")])
//!     .with_events(vec![Event::new("Concert", 10, "alice")])
//!     .build()
//!     .await?;
//!
//! assert_eq!(fixture.events().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use boxoffice_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use boxoffice_testing::mocks::FixedClock;
    /// use boxoffice_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::default() + chrono::Duration::days(20_089))
    }
}

pub mod failing_store;
pub mod fixtures;

// Re-export commonly used items
pub use failing_store::FailingStore;
pub use fixtures::Fixture;
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
