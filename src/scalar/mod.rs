//! Plain scalar metrics
//!
//! [`Counter`] and [`Gauge`] keep a single number and a "used" flag. They
//! share the [`Metric`](crate::traits::Metric) read surface with the
//! histogram and meter so a registry can treat every metric alike.
//!
//! # Example
//!
//! ```
//! use flowmetrics::scalar::{Counter, Gauge};
//! use flowmetrics::traits::Metric;
//!
//! let mut errors = Counter::default();
//! let mut queue_depth = Gauge::new();
//!
//! errors.inc(1);
//! queue_depth.set(17.0);
//!
//! let metrics: [&dyn Metric; 2] = [&errors, &queue_depth];
//! assert!(metrics.iter().all(|m| m.is_used()));
//! ```

mod counter;
mod gauge;

pub use counter::Counter;
pub use gauge::Gauge;
