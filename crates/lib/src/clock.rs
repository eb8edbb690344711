//! Time provider abstraction
//!
//! Timestamps stamped onto documents and entries (`createdAt`, `lastLogin`)
//! go through the [`Clock`] trait so production code uses real system time
//! while tests substitute a controllable clock.

use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// A time provider for generating document timestamps.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> u64;

    /// Returns the current time as an RFC3339-formatted string.
    ///
    /// This is the representation persisted into documents.
    fn now_rfc3339(&self) -> String;
}

/// Production clock backed by [`std::time::SystemTime`] and [`chrono::Utc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn now_rfc3339(&self) -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

/// Test clock that starts at a fixed point and advances one millisecond per
/// reading, so consecutive timestamps are distinct but deterministic.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct FixedClock {
    millis: Mutex<u64>,
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    /// Create a new fixed clock with the given initial time in milliseconds.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        *self.millis.lock().unwrap() += ms;
    }

    /// Get the current time without advancing it.
    pub fn get(&self) -> u64 {
        *self.millis.lock().unwrap()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        let mut millis = self.millis.lock().unwrap();
        let t = *millis;
        *millis += 1;
        t
    }

    fn now_rfc3339(&self) -> String {
        use chrono::{TimeZone, Utc};
        let millis = self.now_millis();
        let secs = (millis / 1000) as i64;
        let nanos = ((millis % 1000) * 1_000_000) as u32;
        Utc.timestamp_opt(secs, nanos)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| "1970-01-01T00:00:00+00:00".to_string())
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}
