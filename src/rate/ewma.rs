//! Exponentially weighted moving average of an event rate
//!
//! Events are accumulated between ticks; every tick turns the accumulated
//! count into an instantaneous rate and folds it into the average with a
//! fixed smoothing factor `alpha = 1 - exp(-tick / period)`. This is the
//! discrete form of continuous exponential decay with time constant
//! `period`, the same scheme Unix load averages use.

use std::time::Duration;

use crate::error::ConfigError;
use crate::time::millis_f64;

/// Default tick cadence
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Default averaging period
pub const DEFAULT_TIME_PERIOD: Duration = Duration::from_secs(60);

/// EWMA rate estimator
///
/// The owner must call [`tick`](Self::tick) once every `tick_interval`;
/// [`Meter`](super::Meter) does this from a background task.
///
/// # Example
///
/// ```
/// use flowmetrics::rate::Ewma;
/// use std::time::Duration;
///
/// let mut ewma = Ewma::one_minute();
/// ewma.update(300);
/// ewma.tick();
///
/// // 300 events in a 5s tick is 60/s; one tick moves 8% of the way there
/// let per_sec = ewma.rate(Duration::from_secs(1));
/// assert!(per_sec > 4.7 && per_sec < 4.9);
/// ```
#[derive(Clone, Debug)]
pub struct Ewma {
    time_period: Duration,
    tick_interval: Duration,
    alpha: f64,
    /// Events since the last tick
    uncounted: u64,
    /// Smoothed rate in events per millisecond
    rate: f64,
}

impl Ewma {
    /// Estimator averaging over `time_period`, ticked every `tick_interval`
    pub fn new(time_period: Duration, tick_interval: Duration) -> Result<Self, ConfigError> {
        if tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if time_period.is_zero() {
            return Err(ConfigError::ZeroTimePeriod);
        }
        Ok(Self::from_validated(time_period, tick_interval))
    }

    fn from_validated(time_period: Duration, tick_interval: Duration) -> Self {
        let alpha = 1.0 - (-millis_f64(tick_interval) / millis_f64(time_period)).exp();
        Self {
            time_period,
            tick_interval,
            alpha,
            uncounted: 0,
            rate: 0.0,
        }
    }

    /// One-minute average, 5 s ticks
    pub fn one_minute() -> Self {
        Self::from_validated(Duration::from_secs(60), DEFAULT_TICK_INTERVAL)
    }

    /// Five-minute average, 5 s ticks
    pub fn five_minutes() -> Self {
        Self::from_validated(Duration::from_secs(5 * 60), DEFAULT_TICK_INTERVAL)
    }

    /// Fifteen-minute average, 5 s ticks
    pub fn fifteen_minutes() -> Self {
        Self::from_validated(Duration::from_secs(15 * 60), DEFAULT_TICK_INTERVAL)
    }

    /// Record `n` events
    pub fn update(&mut self, n: u64) {
        self.uncounted = self.uncounted.saturating_add(n);
    }

    /// Fold the events since the last tick into the average
    pub fn tick(&mut self) {
        let instant_rate = self.uncounted as f64 / millis_f64(self.tick_interval);
        self.uncounted = 0;
        self.rate += self.alpha * (instant_rate - self.rate);
    }

    /// Smoothed rate in events per `unit`
    pub fn rate(&self, unit: Duration) -> f64 {
        self.rate * millis_f64(unit)
    }

    /// Smoothed rate in events per millisecond
    pub fn rate_per_millis(&self) -> f64 {
        self.rate
    }

    /// Smoothing factor applied on each tick
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Expected tick cadence
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Averaging period
    pub fn time_period(&self) -> Duration {
        self.time_period
    }

    /// Events recorded since the last tick
    pub fn pending(&self) -> u64 {
        self.uncounted
    }
}

impl Default for Ewma {
    fn default() -> Self {
        Self::from_validated(DEFAULT_TIME_PERIOD, DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_closed_form() {
        let period = Duration::from_secs(60);
        let ewma = Ewma::new(period, period).unwrap();
        let expected = 1.0 - (-1.0f64).exp();

        assert!((ewma.alpha() - expected).abs() < 1e-15);
        assert!((ewma.alpha() - 0.6321206).abs() < 1e-7);
    }

    #[test]
    fn test_single_tick() {
        let period = Duration::from_secs(60);
        let mut ewma = Ewma::new(period, period).unwrap();
        let alpha = 1.0 - (-1.0f64).exp();

        ewma.update(60);
        ewma.tick();

        // 60 events over a 60_000 ms tick
        let expected_per_ms = alpha * (60.0 / 60_000.0);
        assert!((ewma.rate_per_millis() - expected_per_ms).abs() < 1e-15);
        assert!((ewma.rate(period) - alpha * 60.0).abs() < 1e-9);
        assert_eq!(ewma.pending(), 0);
    }

    #[test]
    fn test_update_does_not_move_rate() {
        let mut ewma = Ewma::one_minute();
        ewma.update(1_000);

        assert_eq!(ewma.rate_per_millis(), 0.0);
        assert_eq!(ewma.pending(), 1_000);
    }

    #[test]
    fn test_decay_without_events() {
        let mut ewma = Ewma::one_minute();
        ewma.update(500);
        ewma.tick();

        let mut previous = ewma.rate_per_millis();
        for _ in 0..10 {
            ewma.tick();
            let current = ewma.rate_per_millis();
            assert!((current - previous * (1.0 - ewma.alpha())).abs() <= previous * 1e-12);
            previous = current;
        }
    }

    #[test]
    fn test_converges_to_steady_rate() {
        let mut ewma = Ewma::one_minute();
        // 10 events per 5s tick: 2 per second
        for _ in 0..500 {
            ewma.update(10);
            ewma.tick();
        }

        assert!((ewma.rate(Duration::from_secs(1)) - 2.0).abs() < 1e-6);
        assert!((ewma.rate(Duration::from_secs(60)) - 120.0).abs() < 1e-4);
    }

    #[test]
    fn test_longer_periods_react_slower() {
        let mut short = Ewma::one_minute();
        let mut long = Ewma::fifteen_minutes();
        let mut mid = Ewma::five_minutes();

        for ewma in [&mut short, &mut mid, &mut long] {
            ewma.update(100);
            ewma.tick();
        }

        assert!(short.rate_per_millis() > mid.rate_per_millis());
        assert!(mid.rate_per_millis() > long.rate_per_millis());
    }

    #[test]
    fn test_invalid_intervals() {
        let s = Duration::from_secs(1);
        assert_eq!(Ewma::new(s, Duration::ZERO).unwrap_err(), ConfigError::ZeroTickInterval);
        assert_eq!(Ewma::new(Duration::ZERO, s).unwrap_err(), ConfigError::ZeroTimePeriod);
    }

    #[test]
    fn test_default_matches_one_minute() {
        let ewma = Ewma::default();
        assert_eq!(ewma.time_period(), Duration::from_secs(60));
        assert_eq!(ewma.tick_interval(), Duration::from_secs(5));
        assert!((ewma.alpha() - Ewma::one_minute().alpha()).abs() < 1e-15);
    }
}
