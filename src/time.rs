//! Time units and clocks
//!
//! Rates and decay ages are computed in milliseconds. [`TimeUnit`] converts
//! between that base and the unit a caller wants to read in; [`Clock`] is the
//! injectable source of "now" so decay can be driven deterministically in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Time unit for reading rates and configuring intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in milliseconds
    pub fn as_millis(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1.0 / 1_000_000.0,
            TimeUnit::Microseconds => 1.0 / 1_000.0,
            TimeUnit::Milliseconds => 1.0,
            TimeUnit::Seconds => 1_000.0,
            TimeUnit::Minutes => 60_000.0,
            TimeUnit::Hours => 3_600_000.0,
            TimeUnit::Days => 86_400_000.0,
        }
    }

    /// One unit as a [`Duration`]
    pub fn duration(self) -> Duration {
        match self {
            TimeUnit::Nanoseconds => Duration::from_nanos(1),
            TimeUnit::Microseconds => Duration::from_micros(1),
            TimeUnit::Milliseconds => Duration::from_millis(1),
            TimeUnit::Seconds => Duration::from_secs(1),
            TimeUnit::Minutes => Duration::from_secs(60),
            TimeUnit::Hours => Duration::from_secs(3_600),
            TimeUnit::Days => Duration::from_secs(86_400),
        }
    }
}

impl From<TimeUnit> for Duration {
    fn from(unit: TimeUnit) -> Self {
        unit.duration()
    }
}

/// Duration in fractional milliseconds
#[inline]
pub(crate) fn millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

/// Source of the current wall-clock time
pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;
}

/// Wall clock backed by [`SystemTime`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually driven clock
///
/// Clones share the same instant, so a test can keep one handle and move
/// time forward while a reservoir holds the other.
///
/// ```
/// use flowmetrics::time::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new(1_000);
/// let shared = clock.clone();
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(shared.now_millis(), 3_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start_millis`
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    /// Set the current time
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    /// Move the current time forward
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_ratios() {
        assert_eq!(TimeUnit::Seconds.as_millis(), 1_000.0);
        assert_eq!(TimeUnit::Minutes.as_millis(), 60.0 * TimeUnit::Seconds.as_millis());
        assert_eq!(TimeUnit::Hours.as_millis(), 60.0 * TimeUnit::Minutes.as_millis());
        assert_eq!(TimeUnit::Days.as_millis(), 24.0 * TimeUnit::Hours.as_millis());
        assert!((TimeUnit::Microseconds.as_millis() * 1_000.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_durations_agree() {
        for unit in [
            TimeUnit::Nanoseconds,
            TimeUnit::Microseconds,
            TimeUnit::Milliseconds,
            TimeUnit::Seconds,
            TimeUnit::Minutes,
            TimeUnit::Hours,
            TimeUnit::Days,
        ] {
            let ms = millis_f64(Duration::from(unit));
            assert!(
                (ms - unit.as_millis()).abs() <= unit.as_millis() * 1e-9,
                "{:?}: {} vs {}",
                unit,
                ms,
                unit.as_millis()
            );
        }
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.now_millis(), 10);

        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now_millis(), 15);

        clock.set(100);
        assert_eq!(clock.clone().now_millis(), 100);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
