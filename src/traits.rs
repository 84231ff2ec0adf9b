//! Core traits shared by all metric kinds
//!
//! Every metric exposes the same read surface: a scalar [`Metric::val`] and a
//! "used" flag telling whether anything was ever recorded. Writes differ per
//! kind (`update`, `mark`, `inc`, `set`) and live on the concrete types.

use core::fmt::Debug;

/// Uniform read surface for metrics
pub trait Metric: Debug {
    /// Current scalar value
    ///
    /// `None` means the metric has no defined value yet (e.g. a percentile
    /// view over an empty histogram).
    fn val(&self) -> Option<f64>;

    /// Whether the metric has received at least one write
    fn is_used(&self) -> bool;

    /// Scalar value, or `default` when undefined
    fn val_or(&self, default: f64) -> f64 {
        self.val().unwrap_or(default)
    }
}

impl<M: Metric + ?Sized> Metric for &M {
    fn val(&self) -> Option<f64> {
        (**self).val()
    }

    fn is_used(&self) -> bool {
        (**self).is_used()
    }
}
