//! Construction-time errors
//!
//! Reads never fail: empty state is reported through `Option`. Everything
//! that can be wrong about a metric is rejected when it is built.

use thiserror::Error;

/// Invalid metric configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Reservoir capacity must be at least one element
    #[error("reservoir capacity must be positive")]
    ZeroCapacity,
    /// Decay factor must be finite and strictly positive
    #[error("invalid decay alpha: {0}")]
    InvalidAlpha(f64),
    /// Rescale interval must be non-zero
    #[error("rescale interval must be non-zero")]
    ZeroRescaleInterval,
    /// EWMA tick interval must be non-zero
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    /// EWMA time period must be non-zero
    #[error("time period must be non-zero")]
    ZeroTimePeriod,
    /// Meter rate unit must be non-zero
    #[error("rate unit must be non-zero")]
    ZeroRateUnit,
    /// Histogram measurement name not recognized
    #[error("unknown measurement: {0:?}")]
    UnknownMeasurement(String),
    /// Meter constructed outside of a tokio runtime
    #[error("meter requires a running tokio runtime to drive its ticks")]
    NoRuntime,
}
