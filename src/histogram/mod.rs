//! Streaming histograms
//!
//! A [`Histogram`] keeps exact running aggregates over every observation
//! and estimates percentiles from a bounded, recency-biased sample, so memory
//! stays fixed no matter how long the stream runs.
//!
//! # Example
//!
//! ```
//! use flowmetrics::histogram::Histogram;
//!
//! let mut histogram = Histogram::new();
//!
//! for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
//!     histogram.update(value);
//! }
//!
//! let results = histogram.full_results();
//! assert_eq!(results.mean, Some(5.0));
//! assert!((results.variance.unwrap() - 32.0 / 7.0).abs() < 1e-9);
//! println!("p99: {:?}", results.p99);
//! ```

#[allow(clippy::module_inception)]
mod histogram;
mod measurement;
mod percentile;

pub use histogram::{FullResults, Histogram, HistogramConfig};
pub use measurement::Measurement;
pub use percentile::{percentile_of_sorted, DEFAULT_PERCENTILES};
