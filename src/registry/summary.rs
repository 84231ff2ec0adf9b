//! Running min/max/mean of timed or sampled values

use log::trace;

use crate::traits::Metric;

/// Running minimum, maximum and mean
///
/// Unlike [`Histogram`](crate::histogram::Histogram) it keeps no sample, so
/// it costs three floats and a count per tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    count: u64,
    min: f64,
    max: f64,
    avg: f64,
}

impl Summary {
    /// Empty summary
    pub fn new() -> Self {
        Self {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            avg: 0.0,
        }
    }

    /// Fold in one value; NaN is ignored
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            trace!("summary ignoring NaN value");
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.count += 1;
        self.avg += (value - self.avg) / self.count as f64;
    }

    /// Number of values folded in
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Running mean
    pub fn avg(&self) -> Option<f64> {
        (self.count > 0).then_some(self.avg)
    }

    /// Forget every value
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric for Summary {
    fn val(&self) -> Option<f64> {
        self.avg()
    }

    fn is_used(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_values() {
        let mut summary = Summary::new();
        for v in [4.0, 10.0, 1.0, 5.0] {
            summary.add(v);
        }

        assert_eq!(summary.count(), 4);
        assert_eq!(summary.min(), Some(1.0));
        assert_eq!(summary.max(), Some(10.0));
        assert!((summary.avg().unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        let summary = Summary::default();
        assert_eq!(summary.min(), None);
        assert_eq!(summary.max(), None);
        assert_eq!(summary.val(), None);
        assert!(!summary.is_used());
    }

    #[test]
    fn test_nan_ignored_and_reset() {
        let mut summary = Summary::new();
        summary.add(f64::NAN);
        assert_eq!(summary.count(), 0);

        summary.add(-2.0);
        assert_eq!(summary.avg(), Some(-2.0));

        summary.reset();
        assert_eq!(summary, Summary::new());
    }
}
