//! # Flowmetrics
//!
//! Streaming runtime metrics for Rust.
//!
//! Flowmetrics answers min/max/sum/count/mean/variance/percentiles and smoothed
//! event rates over a live stream of observations without retaining the
//! stream, with bounded memory and O(log n) updates.
//!
//! ## Features
//!
//! - **Histograms**: exact running aggregates plus percentiles estimated from
//!   a forward-decay reservoir sample
//! - **Decaying Samples**: fixed-size, recency-biased reservoirs with
//!   injectable randomness and clocks
//! - **Rate Meters**: EWMA rates ticked by a background tokio task
//! - **Priority Heaps**: binary heaps ordered by a caller-supplied score
//! - **Registry**: tag-keyed counters, sample summaries and data values with
//!   a JSON report
//!
//! ## Quick Start
//!
//! ```rust
//! use flowmetrics::prelude::*;
//!
//! // Track request latency, report p99
//! let mut latency = Histogram::with_measurement("p99").unwrap();
//! for ms in [12.0, 8.5, 40.1, 9.9, 11.2] {
//!     latency.update(ms);
//! }
//! println!("p99 latency: {:?}", latency.val());
//!
//! let summary = latency.full_results();
//! assert_eq!(summary.count, 5);
//! assert_eq!(summary.max, Some(40.1));
//! ```
//!
//! ## Determinism
//!
//! Every source of nondeterminism is a type parameter. Tests pin the random
//! draws with a closure and the clock with [`ManualClock`](time::ManualClock):
//!
//! ```rust
//! use flowmetrics::histogram::{Histogram, HistogramConfig};
//! use flowmetrics::time::ManualClock;
//!
//! let clock = ManualClock::new(0);
//! let mut h = Histogram::with_parts(HistogramConfig::default(), || 0.5, clock).unwrap();
//! h.update(1.0);
//! assert_eq!(h.sample().landmark(), Some(0));
//! ```
//!
//! ## Feature Flags
//!
//! Algorithm families (pick what you need):
//! - `sampling`: decaying reservoir sample
//! - `histogram` (default): histogram, implies `sampling`
//! - `rate`: EWMA rate estimator
//! - `meter` (default): self-ticking meter on tokio, implies `rate`
//! - `registry`: tag-keyed statistics registry, implies `serde`
//! - `full`: Enable everything
//!
//! Platform features:
//! - `serde`: Serialize configurations and histogram snapshots

#![cfg_attr(docsrs, feature(doc_cfg))]

// Core modules always available
pub mod error;
pub mod heap;
pub mod scalar;
pub mod time;
pub mod traits;

#[cfg(feature = "sampling")]
#[cfg_attr(docsrs, doc(cfg(feature = "sampling")))]
pub mod sampling;

#[cfg(feature = "histogram")]
#[cfg_attr(docsrs, doc(cfg(feature = "histogram")))]
pub mod histogram;

#[cfg(feature = "rate")]
#[cfg_attr(docsrs, doc(cfg(feature = "rate")))]
pub mod rate;

#[cfg(feature = "registry")]
#[cfg_attr(docsrs, doc(cfg(feature = "registry")))]
pub mod registry;

pub mod prelude {
    pub use crate::error::ConfigError;
    pub use crate::heap::PriorityHeap;
    pub use crate::scalar::{Counter, Gauge};
    pub use crate::time::TimeUnit;
    pub use crate::traits::*;

    #[cfg(feature = "sampling")]
    pub use crate::sampling::{DecayingReservoir, ReservoirConfig};

    #[cfg(feature = "histogram")]
    pub use crate::histogram::{FullResults, Histogram, HistogramConfig, Measurement};

    #[cfg(feature = "rate")]
    pub use crate::rate::Ewma;

    #[cfg(feature = "meter")]
    pub use crate::rate::{Meter, MeterConfig};

    #[cfg(feature = "registry")]
    pub use crate::registry::{Statistics, StatisticsConfig, TagKind};
}

pub use error::ConfigError;
pub use heap::PriorityHeap;

#[cfg(feature = "sampling")]
pub use sampling::DecayingReservoir;

#[cfg(feature = "histogram")]
pub use histogram::Histogram;

#[cfg(feature = "rate")]
pub use rate::Ewma;

#[cfg(feature = "meter")]
pub use rate::Meter;

#[cfg(feature = "registry")]
pub use registry::Statistics;
