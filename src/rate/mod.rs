//! Event rate estimation
//!
//! This module provides exponentially weighted rate averages. [`Ewma`] is the
//! bare estimator, ticked by its owner; with the `meter` feature, [`Meter`]
//! wraps one together with a tokio task that ticks it.
//!
//! # Algorithms
//!
//! - [`Ewma`]: tick-driven exponentially weighted moving average
//! - [`Meter`]: self-ticking EWMA reporting events per unit of time
//!
//! # Example
//!
//! ```
//! use flowmetrics::rate::Ewma;
//! use std::time::Duration;
//!
//! let mut ewma = Ewma::one_minute();
//!
//! // Steady 10 events per 5 s tick
//! for _ in 0..200 {
//!     ewma.update(10);
//!     ewma.tick();
//! }
//!
//! let per_second = ewma.rate(Duration::from_secs(1));
//! assert!((per_second - 2.0).abs() < 1e-3);
//! ```

mod ewma;
#[cfg(feature = "meter")]
mod meter;

pub use ewma::{Ewma, DEFAULT_TICK_INTERVAL, DEFAULT_TIME_PERIOD};

#[cfg(feature = "meter")]
#[cfg_attr(docsrs, doc(cfg(feature = "meter")))]
pub use meter::{Meter, MeterConfig};
