//! Stream sampling algorithms
//!
//! This module provides a bounded, recency-biased sample of an unbounded
//! stream. Statistics computed over the sample approximate statistics over
//! recent history, with smooth exponential decay instead of a hard window.
//!
//! # Algorithms
//!
//! - [`DecayingReservoir`]: forward-decay reservoir backed by a
//!   [`PriorityHeap`](crate::heap::PriorityHeap)
//!
//! # Example
//!
//! ```
//! use flowmetrics::sampling::{DecayingReservoir, ReservoirConfig};
//! use flowmetrics::time::ManualClock;
//!
//! // Fixed draws and a frozen clock make the retained set reproducible
//! let mut draws = [0.5, 0.25, 0.8, 0.1].into_iter();
//! let random = move || draws.next().unwrap_or(0.5);
//! let config = ReservoirConfig::default().with_capacity(3);
//! let mut sample = DecayingReservoir::with_parts(config, random, ManualClock::new(0)).unwrap();
//!
//! for v in [1.0, 2.0, 3.0, 4.0] {
//!     sample.update(v);
//! }
//!
//! assert_eq!(sample.sorted_values(), vec![4.0, 2.0, 1.0]);
//! ```

mod decaying;
mod random;

pub use decaying::{
    DecayingReservoir, ReservoirConfig, SampleElement, DEFAULT_ALPHA, DEFAULT_CAPACITY,
    DEFAULT_RESCALE_INTERVAL,
};
pub use random::{DefaultRandom, RandomSource, RngSource};
