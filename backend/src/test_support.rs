//! Shared test doubles for unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so the
//! integration suites under `tests/` can reuse them.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{DataAccessService, TableRegistry};
use crate::outbound::memory::InMemoryRowStore;

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start the clock at 2026-01-05 08:00:00 UTC.
    pub fn at_monday_morning() -> Self {
        match Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).single() {
            Some(now) => Self::new(now),
            None => panic!("fixed start time is unambiguous"),
        }
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Lenient service over the full ClientFlow registry and an empty in-memory
/// store, sharing `clock` between the service and the store.
pub fn in_memory_service(clock: Arc<MutableClock>) -> DataAccessService {
    let registry = match TableRegistry::clientflow() {
        Ok(registry) => Arc::new(registry),
        Err(err) => panic!("clientflow registry is valid: {err}"),
    };
    let store = Arc::new(InMemoryRowStore::new(clock.clone()));
    DataAccessService::new(registry, store, clock)
}
