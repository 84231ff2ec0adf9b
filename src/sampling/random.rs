//! Random sources for priority draws
//!
//! The reservoir never touches a global generator. It owns a
//! [`RandomSource`], which is either a `rand` generator wrapped in
//! [`RngSource`] or any `FnMut() -> f64` closure, the latter being the
//! usual way to feed a fixed sequence in tests.

use rand::distributions::Open01;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform draws in the open unit interval
pub trait RandomSource {
    /// Next draw from `Uniform(0, 1)`
    ///
    /// Implementations should avoid returning exactly `0.0`; callers clamp
    /// such values anyway.
    fn next_unit(&mut self) -> f64;
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Adapter turning any [`rand::Rng`] into a [`RandomSource`]
#[derive(Clone, Debug)]
pub struct RngSource<R>(R);

/// Default generator: a small, fast, non-cryptographic PRNG
pub type DefaultRandom = RngSource<SmallRng>;

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self(rng)
    }

    /// Unwrap the generator
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl RngSource<SmallRng> {
    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }

    /// Generator with a fixed seed (for reproducibility)
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl Default for RngSource<SmallRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.sample(Open01)
    }
}

/// Clamp a draw into `[f64::EPSILON, 1.0]`
///
/// A zero draw would make the priority infinite and pin that element in the
/// reservoir forever. NaN is treated like zero.
#[inline]
pub(crate) fn clamp_unit(u: f64) -> f64 {
    if u.is_nan() || u < f64::EPSILON {
        f64::EPSILON
    } else if u > 1.0 {
        1.0
    } else {
        u
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_in_open_interval() {
        let mut source = RngSource::seeded(7);
        for _ in 0..10_000 {
            let u = source.next_unit();
            assert!(u > 0.0 && u < 1.0, "draw {} out of (0, 1)", u);
        }
    }

    #[test]
    fn test_seeded_reproducibility() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn test_closure_source() {
        let mut draws = [0.25, 0.75].into_iter().cycle();
        let mut source = move || draws.next().unwrap_or(0.5);

        assert_eq!(source.next_unit(), 0.25);
        assert_eq!(source.next_unit(), 0.75);
        assert_eq!(source.next_unit(), 0.25);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(0.0), f64::EPSILON);
        assert_eq!(clamp_unit(-3.0), f64::EPSILON);
        assert_eq!(clamp_unit(f64::NAN), f64::EPSILON);
        assert_eq!(clamp_unit(2.0), 1.0);
        assert_eq!(clamp_unit(0.5), 0.5);
    }
}
