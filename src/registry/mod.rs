//! Tag-keyed metrics registry
//!
//! A [`Statistics`] registry buckets named tags into three kinds: counters,
//! sample summaries (running min/max/avg) and free-form data values. It
//! renders every tag into one [`Report`] stamped with the process identity,
//! ready to be shipped as JSON.
//!
//! # Example
//!
//! ```
//! use flowmetrics::registry::{Statistics, StatisticsConfig, TagKind};
//! use flowmetrics::time::ManualClock;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new(0);
//! let mut stats = Statistics::with_clock(StatisticsConfig::default(), clock.clone());
//! stats.init(TagKind::Samples, "db_success", Some("DB query (ms)"));
//!
//! let timer = stats.timer("db");
//! clock.advance(Duration::from_millis(12));
//! timer.ok(&mut stats);
//!
//! let json = stats.json_report().unwrap();
//! assert!(json.contains(r#""tag":"db_success""#));
//!
//! // Start the next reporting window
//! stats.flush();
//! ```

mod report;
mod statistics;
mod summary;

pub use report::{Report, TagReport};
pub use statistics::{Statistics, StatisticsConfig, TagEntry, TagKind, TagValue, Timer};
pub use summary::Summary;
