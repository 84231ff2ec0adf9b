//! Forward-decay reservoir sampling
//!
//! A fixed-size random sample biased toward recent observations. Each value
//! gets priority `exp(alpha * age_secs) / u` with `u ~ Uniform(0, 1)`, where
//! age is measured forward from a landmark timestamp. The reservoir keeps the
//! `capacity` highest priorities, so newer values (larger weights) displace
//! older ones smoothly instead of falling off a hard window.
//!
//! The weight grows without bound as the stream ages, so every
//! `rescale_interval` the landmark moves to "now" and all retained priorities
//! are multiplied by the same correction factor. Relative order is unchanged.
//!
//! Reference: Cormode, Shkapenyuk, Srivastava, Xu, "Forward Decay: A
//! Practical Time Decay Model for Streaming Systems" (ICDE 2009).

use core::fmt;
use std::time::Duration;

use log::debug;

use super::random::{clamp_unit, DefaultRandom, RandomSource};
use crate::error::ConfigError;
use crate::heap::PriorityHeap;
use crate::time::{Clock, SystemClock};

/// Default number of retained samples
pub const DEFAULT_CAPACITY: usize = 1028;

/// Default decay factor (per second of age)
pub const DEFAULT_ALPHA: f64 = 0.015;

/// Default landmark rescale interval
pub const DEFAULT_RESCALE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// A retained observation with its decay-weighted priority
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleElement {
    /// `weight(age) / u`, relative to the current landmark
    pub priority: f64,
    /// Observed value
    pub value: f64,
}

/// Lowest priority scores highest, so the heap root is the eviction candidate.
fn eviction_score(element: &SampleElement) -> f64 {
    -element.priority
}

/// Reservoir configuration
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReservoirConfig {
    /// Maximum number of retained samples
    pub capacity: usize,
    /// Decay factor; larger values forget faster
    pub alpha: f64,
    /// How often the landmark is moved forward
    pub rescale_interval: Duration,
}

impl Default for ReservoirConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            alpha: DEFAULT_ALPHA,
            rescale_interval: DEFAULT_RESCALE_INTERVAL,
        }
    }
}

impl ReservoirConfig {
    /// Set the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the decay factor
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the rescale interval
    pub fn with_rescale_interval(mut self, interval: Duration) -> Self {
        self.rescale_interval = interval;
        self
    }

    /// Check the configuration for values the sampler cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if self.rescale_interval.as_millis() == 0 {
            return Err(ConfigError::ZeroRescaleInterval);
        }
        Ok(())
    }
}

/// Exponentially decaying reservoir sample
///
/// Generic over its [`RandomSource`] and [`Clock`] so both can be pinned in
/// tests; the defaults draw from an entropy-seeded PRNG and read the system
/// clock.
///
/// # Example
///
/// ```
/// use flowmetrics::sampling::{DecayingReservoir, ReservoirConfig};
///
/// let config = ReservoirConfig::default().with_capacity(100);
/// let mut reservoir = DecayingReservoir::with_config(config).unwrap();
///
/// for i in 0..10_000 {
///     reservoir.update(i as f64);
/// }
///
/// assert_eq!(reservoir.len(), 100);
/// assert!(reservoir.avg().is_some());
/// ```
#[derive(Clone)]
pub struct DecayingReservoir<R = DefaultRandom, C = SystemClock> {
    elements: PriorityHeap<SampleElement, f64>,
    config: ReservoirConfig,
    /// Epoch milliseconds ages are measured from; set by the first update
    landmark: Option<u64>,
    next_rescale: u64,
    random: R,
    clock: C,
}

impl DecayingReservoir {
    /// Reservoir with the default configuration
    pub fn new() -> Self {
        Self::from_validated(
            ReservoirConfig::default(),
            DefaultRandom::default(),
            SystemClock,
        )
    }

    /// Reservoir with a custom configuration and default random source
    pub fn with_config(config: ReservoirConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, DefaultRandom::default(), SystemClock)
    }
}

impl Default for DecayingReservoir {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource, C: Clock> DecayingReservoir<R, C> {
    /// Reservoir with explicit random source and clock
    pub fn with_parts(config: ReservoirConfig, random: R, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config, random, clock))
    }

    fn from_validated(config: ReservoirConfig, random: R, clock: C) -> Self {
        Self {
            elements: PriorityHeap::with_capacity(
                config.capacity,
                eviction_score as fn(&SampleElement) -> f64,
            ),
            config,
            landmark: None,
            next_rescale: 0,
            random,
            clock,
        }
    }

    /// Offer a value observed now
    pub fn update(&mut self, value: f64) {
        let now = self.clock.now_millis();
        self.record(value, now, now);
    }

    /// Offer a value observed at `timestamp` (epoch milliseconds)
    ///
    /// The timestamp only sets the value's age. Landmark initialization and
    /// rescaling still follow the reservoir's clock, and timestamps ahead of
    /// it are treated as "now".
    pub fn update_at(&mut self, value: f64, timestamp: u64) {
        let now = self.clock.now_millis();
        self.record(value, timestamp.min(now), now);
    }

    fn record(&mut self, value: f64, timestamp: u64, now: u64) {
        let landmark = match self.landmark {
            Some(landmark) => landmark,
            None => {
                self.landmark = Some(now);
                self.next_rescale = now.saturating_add(self.rescale_interval_millis());
                now
            }
        };

        let u = clamp_unit(self.random.next_unit());
        let mut priority = self.weight(timestamp as f64 - landmark as f64) / u;
        if !priority.is_finite() {
            // Weight outgrew f64 before the scheduled rescale: rebase now.
            // timestamp <= now, so the new weight is at most 1.
            self.rescale(now);
            priority = self.weight(timestamp as f64 - now as f64) / u;
        }
        let element = SampleElement { priority, value };

        if self.elements.len() < self.config.capacity {
            self.elements.add(element);
        } else if let Some(min) = self.elements.first() {
            if element.priority > min.priority {
                self.elements.remove_first();
                self.elements.add(element);
            }
        }

        if now >= self.next_rescale {
            self.rescale(now);
        }
    }

    /// `exp(alpha * age_secs)`; age is in milliseconds
    fn weight(&self, age_millis: f64) -> f64 {
        (self.config.alpha * (age_millis / 1000.0)).exp()
    }

    fn rescale(&mut self, now: u64) {
        let old_landmark = self.landmark.unwrap_or(now);
        self.landmark = Some(now);
        self.next_rescale = now.saturating_add(self.rescale_interval_millis());

        let factor = self.weight(-(now as f64 - old_landmark as f64));
        debug!(
            "rescaling decaying reservoir: landmark {} -> {}, {} samples, factor {:e}",
            old_landmark,
            now,
            self.elements.len(),
            factor
        );
        self.elements.update_all(|element| element.priority *= factor);
    }

    fn rescale_interval_millis(&self) -> u64 {
        self.config.rescale_interval.as_millis() as u64
    }
}

impl<R, C> DecayingReservoir<R, C> {
    /// Retained values in heap-internal order
    pub fn values(&self) -> Vec<f64> {
        self.elements.iter().map(|e| e.value).collect()
    }

    /// Retained values, highest priority first
    pub fn sorted_values(&self) -> Vec<f64> {
        // The heap drains lowest priority first.
        let mut values: Vec<f64> = self
            .elements
            .to_sorted_vec()
            .into_iter()
            .map(|e| e.value)
            .collect();
        values.reverse();
        values
    }

    /// Retained elements with their priorities, in heap-internal order
    pub fn samples(&self) -> impl Iterator<Item = &SampleElement> + '_ {
        self.elements.iter()
    }

    /// Mean of the retained values, `None` when nothing is retained
    pub fn avg(&self) -> Option<f64> {
        if self.elements.is_empty() {
            return None;
        }
        let sum: f64 = self.elements.iter().map(|e| e.value).sum();
        Some(sum / self.elements.len() as f64)
    }

    /// Lowest retained priority (the next eviction candidate)
    pub fn min_priority(&self) -> Option<f64> {
        self.elements.first().map(|e| e.priority)
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if nothing is retained
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Check if the reservoir is at capacity
    pub fn is_full(&self) -> bool {
        self.elements.len() >= self.config.capacity
    }

    /// Maximum number of retained samples
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Decay factor
    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    /// Landmark rescale interval
    pub fn rescale_interval(&self) -> Duration {
        self.config.rescale_interval
    }

    /// Current landmark (epoch milliseconds), `None` before the first update
    pub fn landmark(&self) -> Option<u64> {
        self.landmark
    }

    /// Drop all samples and forget the landmark
    pub fn clear(&mut self) {
        self.elements.clear();
        self.landmark = None;
        self.next_rescale = 0;
    }
}

impl<R, C> fmt::Debug for DecayingReservoir<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecayingReservoir")
            .field("len", &self.elements.len())
            .field("config", &self.config)
            .field("landmark", &self.landmark)
            .field("next_rescale", &self.next_rescale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    const START: u64 = 1_700_000_000_000;

    fn sequence(draws: Vec<f64>) -> impl FnMut() -> f64 {
        let mut draws = draws.into_iter();
        move || draws.next().unwrap_or(0.5)
    }

    #[test]
    fn test_basic() {
        let config = ReservoirConfig::default().with_capacity(5);
        let mut reservoir = DecayingReservoir::with_config(config).unwrap();

        for i in 0..10 {
            reservoir.update(i as f64);
        }

        assert_eq!(reservoir.len(), 5);
        assert!(reservoir.is_full());
        assert!(reservoir.values().iter().all(|v| (0.0..10.0).contains(v)));
    }

    #[test]
    fn test_underfilled_keeps_everything() {
        let config = ReservoirConfig::default().with_capacity(100);
        let mut reservoir = DecayingReservoir::with_config(config).unwrap();

        for i in 0..10 {
            reservoir.update(i as f64);
        }

        let mut values = reservoir.values();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, (0..10).map(|i| i as f64).collect::<Vec<_>>());
        assert!(!reservoir.is_full());
    }

    #[test]
    fn test_admission_with_fixed_draws() {
        // All ages are zero, so priority = 1 / u: 2, 4, 1.25, 10, 1.11
        let config = ReservoirConfig::default().with_capacity(3);
        let random = sequence(vec![0.5, 0.25, 0.8, 0.1, 0.9]);
        let mut reservoir =
            DecayingReservoir::with_parts(config, random, ManualClock::new(START)).unwrap();

        for v in [0.0, 1.0, 2.0, 3.0, 4.0] {
            reservoir.update(v);
        }

        // 3.0 evicted 2.0 (priority 1.25); 4.0 fell below the minimum and was dropped
        assert_eq!(reservoir.sorted_values(), vec![3.0, 1.0, 0.0]);
        assert!((reservoir.min_priority().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_landmark_set_lazily() {
        let clock = ManualClock::new(START);
        let mut reservoir =
            DecayingReservoir::with_parts(ReservoirConfig::default(), sequence(vec![]), clock.clone())
                .unwrap();

        assert_eq!(reservoir.landmark(), None);

        clock.advance(Duration::from_secs(30));
        reservoir.update(1.0);
        assert_eq!(reservoir.landmark(), Some(START + 30_000));
    }

    #[test]
    fn test_newer_timestamps_get_larger_priorities() {
        let clock = ManualClock::new(START + 60_000);
        let mut reservoir =
            DecayingReservoir::with_parts(ReservoirConfig::default(), || 0.5, clock).unwrap();

        reservoir.update_at(1.0, START);
        reservoir.update_at(2.0, START + 60_000);

        let mut samples: Vec<SampleElement> = reservoir.samples().copied().collect();
        samples.sort_by(|a, b| a.value.total_cmp(&b.value));

        let expected_ratio = (DEFAULT_ALPHA * 60.0).exp();
        assert!((samples[1].priority / samples[0].priority - expected_ratio).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_preserves_order_and_rebases() {
        let clock = ManualClock::new(START);
        let draws = vec![0.9, 0.3, 0.6, 0.1, 0.5];
        let config = ReservoirConfig::default().with_capacity(10);
        let mut reservoir = DecayingReservoir::with_parts(config, sequence(draws), clock.clone()).unwrap();

        for v in [10.0, 20.0, 30.0, 40.0] {
            reservoir.update(v);
        }
        let order_before = reservoir.sorted_values();

        clock.advance(DEFAULT_RESCALE_INTERVAL);
        reservoir.update(50.0);

        let new_now = START + DEFAULT_RESCALE_INTERVAL.as_millis() as u64;
        assert_eq!(reservoir.landmark(), Some(new_now));

        // Old elements are scaled by exp(-alpha * 3600); their order holds.
        let order_after: Vec<f64> = reservoir
            .sorted_values()
            .into_iter()
            .filter(|v| *v != 50.0)
            .collect();
        assert_eq!(order_before, order_after);

        let factor = (-DEFAULT_ALPHA * 3600.0).exp();
        let ten = reservoir.samples().find(|e| e.value == 10.0).unwrap();
        assert!((ten.priority - factor / 0.9).abs() < 1e-30);

        // The newest element was inserted just before the rescale: e^(a*3600) * e^(-a*3600) / u
        let fifty = reservoir.samples().find(|e| e.value == 50.0).unwrap();
        assert!((fifty.priority - 1.0 / 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_happens_once_per_interval() {
        let clock = ManualClock::new(START);
        let config = ReservoirConfig::default().with_rescale_interval(Duration::from_secs(10));
        let mut reservoir = DecayingReservoir::with_parts(config, || 0.5, clock.clone()).unwrap();

        reservoir.update(1.0);
        clock.advance(Duration::from_secs(5));
        reservoir.update(2.0);
        assert_eq!(reservoir.landmark(), Some(START));

        clock.advance(Duration::from_secs(5));
        reservoir.update(3.0);
        assert_eq!(reservoir.landmark(), Some(START + 10_000));

        clock.advance(Duration::from_secs(9));
        reservoir.update(4.0);
        assert_eq!(reservoir.landmark(), Some(START + 10_000));
    }

    #[test]
    fn test_zero_draw_is_clamped() {
        let config = ReservoirConfig::default().with_capacity(2);
        let mut reservoir =
            DecayingReservoir::with_parts(config, || 0.0, ManualClock::new(START)).unwrap();

        reservoir.update(1.0);
        reservoir.update(2.0);

        assert!(reservoir.samples().all(|e| e.priority.is_finite()));
    }

    #[test]
    fn test_long_idle_gap_rebases_before_admission() {
        let clock = ManualClock::new(START);
        let config = ReservoirConfig::default().with_capacity(4);
        let mut reservoir = DecayingReservoir::with_parts(config, || 0.5, clock.clone()).unwrap();

        for v in [1.0, 2.0, 3.0, 4.0] {
            reservoir.update(v);
        }

        // exp(0.015 * 86_400) overflows f64
        clock.advance(Duration::from_secs(24 * 60 * 60));
        reservoir.update(5.0);

        assert_eq!(reservoir.landmark(), Some(clock.now_millis()));
        assert!(reservoir.samples().all(|e| e.priority.is_finite()));
        assert_eq!(reservoir.sorted_values()[0], 5.0);
    }

    #[test]
    fn test_fast_decay_rebases_before_schedule() {
        // exp(1.0 * age_s) overflows after ~12 minutes, long before the hourly rescale
        let clock = ManualClock::new(START);
        let config = ReservoirConfig::default().with_capacity(3).with_alpha(1.0);
        let mut reservoir = DecayingReservoir::with_parts(config, || 0.5, clock.clone()).unwrap();

        for i in 0..130 {
            clock.advance(Duration::from_secs(60));
            reservoir.update(i as f64);
            assert!(
                reservoir.samples().all(|e| e.priority.is_finite()),
                "non-finite priority after minute {}",
                i
            );
        }
        assert_eq!(reservoir.sorted_values(), vec![129.0, 128.0, 127.0]);

        for i in 0..5 {
            clock.advance(Duration::from_secs(1));
            reservoir.update(1_000.0 + i as f64);
        }
        assert_eq!(reservoir.sorted_values(), vec![1_004.0, 1_003.0, 1_002.0]);
    }

    #[test]
    fn test_future_timestamp_does_not_pin_sample() {
        let clock = ManualClock::new(START);
        let config = ReservoirConfig::default().with_capacity(2);
        let mut reservoir = DecayingReservoir::with_parts(config, || 0.5, clock.clone()).unwrap();

        reservoir.update(1.0);
        reservoir.update_at(2.0, START + 365 * 86_400_000);
        assert!(reservoir.samples().all(|e| e.priority.is_finite()));

        clock.advance(Duration::from_secs(60));
        reservoir.update(3.0);
        clock.advance(Duration::from_secs(1));
        reservoir.update(4.0);
        assert_eq!(reservoir.sorted_values(), vec![4.0, 3.0]);
    }

    #[test]
    fn test_avg() {
        let mut reservoir = DecayingReservoir::new();
        assert_eq!(reservoir.avg(), None);

        for v in [1.0, 2.0, 3.0, 6.0] {
            reservoir.update(v);
        }
        assert_eq!(reservoir.avg(), Some(3.0));
    }

    #[test]
    fn test_clear() {
        let mut reservoir = DecayingReservoir::new();
        reservoir.update(1.0);
        reservoir.clear();

        assert!(reservoir.is_empty());
        assert_eq!(reservoir.landmark(), None);
        assert_eq!(reservoir.avg(), None);
    }

    #[test]
    fn test_invalid_config() {
        let zero = ReservoirConfig::default().with_capacity(0);
        assert_eq!(
            DecayingReservoir::with_config(zero).unwrap_err(),
            ConfigError::ZeroCapacity
        );

        for alpha in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let config = ReservoirConfig::default().with_alpha(alpha);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidAlpha(_))
            ));
        }

        let no_interval = ReservoirConfig::default().with_rescale_interval(Duration::ZERO);
        assert_eq!(no_interval.validate(), Err(ConfigError::ZeroRescaleInterval));
    }

    #[test]
    fn test_defaults() {
        let reservoir = DecayingReservoir::new();
        assert_eq!(reservoir.capacity(), 1028);
        assert_eq!(reservoir.alpha(), 0.015);
        assert_eq!(reservoir.rescale_interval(), Duration::from_secs(3600));
    }
}
