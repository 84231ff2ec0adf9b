//! Streaming histogram
//!
//! Exact running aggregates (count, sum, min, max, Welford variance, adaptive
//! EMA) over every observation, plus percentiles approximated from a
//! forward-decay reservoir sample.

use core::fmt;

use log::trace;

use super::measurement::Measurement;
use super::percentile::{percentiles_of, DEFAULT_PERCENTILES};
use crate::error::ConfigError;
use crate::sampling::{DecayingReservoir, DefaultRandom, RandomSource, ReservoirConfig};
use crate::time::{Clock, SystemClock};
use crate::traits::Metric;

/// Histogram configuration
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HistogramConfig {
    /// Statistic returned by [`Histogram::val`]
    pub measurement: Measurement,
    /// Backing sample configuration
    pub reservoir: ReservoirConfig,
}

impl HistogramConfig {
    /// Set the scalar measurement
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurement = measurement;
        self
    }

    /// Set the reservoir configuration
    pub fn with_reservoir(mut self, reservoir: ReservoirConfig) -> Self {
        self.reservoir = reservoir;
        self
    }
}

/// Every statistic of a histogram, taken at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FullResults {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
    pub variance: Option<f64>,
    pub mean: Option<f64>,
    pub count: u64,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
    pub p999: Option<f64>,
    pub ema: Option<f64>,
}

impl FullResults {
    /// Look up one measurement
    pub fn get(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Min => self.min,
            Measurement::Max => self.max,
            Measurement::Sum => Some(self.sum),
            Measurement::Count => Some(self.count as f64),
            Measurement::Variance => self.variance,
            Measurement::Mean => self.mean,
            Measurement::Ema => self.ema,
            Measurement::Median => self.median,
            Measurement::P75 => self.p75,
            Measurement::P95 => self.p95,
            Measurement::P99 => self.p99,
            Measurement::P999 => self.p999,
        }
    }
}

/// Streaming histogram
///
/// Count, sum, min, max and mean are exact over every observation ever
/// recorded. Percentiles come from the retained sample and are approximate.
///
/// # Example
///
/// ```
/// use flowmetrics::histogram::{Histogram, Measurement};
/// use flowmetrics::traits::Metric;
///
/// let mut latency = Histogram::with_measurement("p95").unwrap();
///
/// for ms in [12.0, 15.0, 11.0, 90.0, 14.0] {
///     latency.update(ms);
/// }
///
/// assert_eq!(latency.count(), 5);
/// assert_eq!(latency.max(), Some(90.0));
/// assert_eq!(latency.val(), Some(90.0));
/// assert_eq!(latency.measurement(), Measurement::P95);
/// ```
#[derive(Clone)]
pub struct Histogram<R = DefaultRandom, C = SystemClock> {
    measurement: Measurement,
    sample: DecayingReservoir<R, C>,
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    /// Welford running mean
    variance_m: f64,
    /// Welford sum of squared deviations
    variance_s: f64,
    ema: f64,
    used: bool,
}

impl Histogram {
    /// Histogram with default configuration, reporting the mean
    pub fn new() -> Self {
        Self::from_parts(Measurement::default(), DecayingReservoir::new())
    }

    /// Histogram reporting the named measurement
    ///
    /// Unknown names are rejected here rather than surfacing as an
    /// undefined value on every read.
    pub fn with_measurement(name: &str) -> Result<Self, ConfigError> {
        let measurement = name.parse()?;
        Ok(Self::from_parts(measurement, DecayingReservoir::new()))
    }

    /// Histogram with a custom configuration
    pub fn with_config(config: HistogramConfig) -> Result<Self, ConfigError> {
        let sample = DecayingReservoir::with_config(config.reservoir)?;
        Ok(Self::from_parts(config.measurement, sample))
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource, C: Clock> Histogram<R, C> {
    /// Histogram with explicit random source and clock for its sample
    pub fn with_parts(config: HistogramConfig, random: R, clock: C) -> Result<Self, ConfigError> {
        let sample = DecayingReservoir::with_parts(config.reservoir, random, clock)?;
        Ok(Self::from_parts(config.measurement, sample))
    }

    /// Record an observation
    ///
    /// NaN is ignored so it cannot poison the running statistics.
    pub fn update(&mut self, value: f64) {
        if value.is_nan() {
            trace!("histogram ignoring NaN observation");
            return;
        }

        self.used = true;
        self.count += 1;
        self.sum += value;

        self.sample.update(value);
        self.update_min_max(value);
        self.update_variance(value);
        self.update_ema(value);
    }
}

impl<R, C> Histogram<R, C> {
    fn from_parts(measurement: Measurement, sample: DecayingReservoir<R, C>) -> Self {
        Self {
            measurement,
            sample,
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            variance_m: 0.0,
            variance_s: 0.0,
            ema: 0.0,
            used: false,
        }
    }

    fn update_min_max(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    fn update_variance(&mut self, value: f64) {
        if self.count == 1 {
            self.variance_m = value;
            return;
        }

        let old_m = self.variance_m;
        self.variance_m += (value - old_m) / self.count as f64;
        self.variance_s += (value - old_m) * (value - self.variance_m);
    }

    /// Cumulative mean at first, slow smoother later: alpha shrinks with count.
    fn update_ema(&mut self, value: f64) {
        if self.count <= 1 {
            self.ema = self.sum / self.count as f64;
            return;
        }
        let alpha = 2.0 / (1.0 + self.count as f64);
        self.ema = value * alpha + self.ema * (1.0 - alpha);
    }

    /// Number of recorded observations
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all observations
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Smallest observation
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// Largest observation
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Arithmetic mean
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Sample variance (Bessel-corrected); needs at least two observations
    pub fn variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.variance_s / (self.count - 1) as f64)
    }

    /// Sample standard deviation
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Adaptive exponential moving average
    pub fn ema(&self) -> Option<f64> {
        (self.count > 0).then_some(self.ema)
    }

    /// Estimate one percentile from the retained sample
    pub fn percentile(&self, p: f64) -> Option<f64> {
        percentiles_of(self.sample.values(), &[p]).pop().flatten()
    }

    /// Estimate several percentiles from a single sample snapshot
    pub fn percentiles(&self, ranks: &[f64]) -> Vec<Option<f64>> {
        percentiles_of(self.sample.values(), ranks)
    }

    /// Every statistic from one consistent snapshot
    pub fn full_results(&self) -> FullResults {
        let p = percentiles_of(self.sample.values(), &DEFAULT_PERCENTILES);

        FullResults {
            min: self.min(),
            max: self.max(),
            sum: self.sum,
            variance: self.variance(),
            mean: self.mean(),
            count: self.count,
            median: p[0],
            p75: p[1],
            p95: p[2],
            p99: p[3],
            p999: p[4],
            ema: self.ema(),
        }
    }

    /// Read one measurement
    pub fn read(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Min => self.min(),
            Measurement::Max => self.max(),
            Measurement::Sum => Some(self.sum),
            Measurement::Count => Some(self.count as f64),
            Measurement::Variance => self.variance(),
            Measurement::Mean => self.mean(),
            Measurement::Ema => self.ema(),
            Measurement::Median
            | Measurement::P75
            | Measurement::P95
            | Measurement::P99
            | Measurement::P999 => measurement.percentile().and_then(|p| self.percentile(p)),
        }
    }

    /// Value of the configured measurement
    pub fn val(&self) -> Option<f64> {
        self.read(self.measurement)
    }

    /// Configured measurement
    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    /// Backing sample
    pub fn sample(&self) -> &DecayingReservoir<R, C> {
        &self.sample
    }

    /// Whether anything has been recorded
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Forget every observation
    pub fn clear(&mut self) {
        self.sample.clear();
        self.count = 0;
        self.sum = 0.0;
        self.min = f64::INFINITY;
        self.max = f64::NEG_INFINITY;
        self.variance_m = 0.0;
        self.variance_s = 0.0;
        self.ema = 0.0;
        self.used = false;
    }
}

impl<R, C> fmt::Debug for Histogram<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram")
            .field("measurement", &self.measurement)
            .field("count", &self.count)
            .field("sum", &self.sum)
            .field("min", &self.min())
            .field("max", &self.max())
            .field("sample", &self.sample)
            .finish()
    }
}

impl<R, C> Metric for Histogram<R, C> {
    fn val(&self) -> Option<f64> {
        Histogram::val(self)
    }

    fn is_used(&self) -> bool {
        self.used
    }
}
