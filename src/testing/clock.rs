// src/testing/clock.rs
use crate::application::ports::time::Clock;
use crate::testing::error::ClockError;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};

/// Clock that reads real time until frozen.
///
/// Clones share state, so the copy handed to the services and the copy held
/// by the test context move together.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    frozen: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins every reading to `at`. Only one override may be active.
    pub fn freeze(&self, at: DateTime<Utc>) -> Result<(), ClockError> {
        let mut guard = self.frozen.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = *guard {
            return Err(ClockError::AlreadyFrozen(current));
        }
        *guard = Some(at);
        tracing::debug!(%at, "clock frozen");
        Ok(())
    }

    /// Back to real time. Resetting a running clock is a no-op.
    pub fn reset(&self) {
        let mut guard = self.frozen.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            tracing::debug!("clock reset to real time");
        }
    }

    /// Freezes at `at` until the returned guard is dropped.
    pub fn travel_to(&self, at: DateTime<Utc>) -> Result<TravelGuard, ClockError> {
        self.freeze(at)?;
        Ok(TravelGuard {
            clock: self.clone(),
        })
    }

    pub fn frozen_at(&self) -> Option<DateTime<Utc>> {
        *self.frozen.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at().is_some()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.frozen_at().unwrap_or_else(Utc::now)
    }
}

#[must_use = "the clock resets as soon as the guard is dropped"]
pub struct TravelGuard {
    clock: MockClock,
}

impl Drop for TravelGuard {
    fn drop(&mut self) {
        self.clock.reset();
    }
}
