//! Monotonic-by-convention event counter

use crate::traits::Metric;

/// Signed event counter
///
/// # Example
///
/// ```
/// use flowmetrics::scalar::Counter;
///
/// let mut active = Counter::new(0);
/// active.inc(3);
/// active.dec(1);
/// assert_eq!(active.count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Counter {
    count: i64,
    used: bool,
}

impl Counter {
    /// Counter starting at `initial`
    pub fn new(initial: i64) -> Self {
        Self {
            count: initial,
            used: false,
        }
    }

    /// Add `n`
    pub fn inc(&mut self, n: i64) {
        self.used = true;
        self.count = self.count.saturating_add(n);
    }

    /// Subtract `n`
    pub fn dec(&mut self, n: i64) {
        self.used = true;
        self.count = self.count.saturating_sub(n);
    }

    /// Set the count without marking the counter as used
    pub fn reset(&mut self, count: i64) {
        self.count = count;
    }

    /// Current count
    pub fn count(&self) -> i64 {
        self.count
    }
}

impl Metric for Counter {
    fn val(&self) -> Option<f64> {
        Some(self.count as f64)
    }

    fn is_used(&self) -> bool {
        self.used
    }
}
