//! Last-value gauge

use crate::traits::Metric;

/// Holds the most recently set value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Gauge {
    value: f64,
    used: bool,
}

impl Gauge {
    /// Gauge reading zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value
    pub fn set(&mut self, value: f64) {
        self.used = true;
        self.value = value;
    }

    /// Current value
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Metric for Gauge {
    fn val(&self) -> Option<f64> {
        Some(self.value)
    }

    fn is_used(&self) -> bool {
        self.used
    }
}
