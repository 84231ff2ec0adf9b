//! Self-ticking rate meter
//!
//! A [`Meter`] owns an [`Ewma`] and a tokio task that ticks it every
//! `tick_interval`. Marks and ticks come from different tasks, so the
//! average sits behind a mutex; everything else about the meter is
//! single-owner.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use super::ewma::{Ewma, DEFAULT_TICK_INTERVAL, DEFAULT_TIME_PERIOD};
use crate::error::ConfigError;
use crate::traits::Metric;

/// Meter configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeterConfig {
    /// Averaging period of the underlying EWMA
    pub time_period: Duration,
    /// How often the background task ticks the EWMA
    pub tick_interval: Duration,
    /// Unit [`Meter::val`] reports in (events per `rate_unit`)
    pub rate_unit: Duration,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            time_period: DEFAULT_TIME_PERIOD,
            tick_interval: DEFAULT_TICK_INTERVAL,
            rate_unit: Duration::from_secs(1),
        }
    }
}

impl MeterConfig {
    /// Set the averaging period
    pub fn with_time_period(mut self, period: Duration) -> Self {
        self.time_period = period;
        self
    }

    /// Set the tick cadence
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the reporting unit
    pub fn with_rate_unit(mut self, unit: impl Into<Duration>) -> Self {
        self.rate_unit = unit.into();
        self
    }

    /// Check the configuration for values the meter cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.time_period.is_zero() {
            return Err(ConfigError::ZeroTimePeriod);
        }
        if self.rate_unit.is_zero() {
            return Err(ConfigError::ZeroRateUnit);
        }
        Ok(())
    }
}

/// Handle to a background tick task
///
/// Stopping (or dropping) the handle aborts the task. The task also exits on
/// its own once the average it ticks has been dropped.
#[derive(Debug)]
pub(crate) struct TickHandle {
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    fn spawn(runtime: &Handle, ewma: Weak<Mutex<Ewma>>, period: Duration) -> Self {
        let start = Instant::now() + period;
        let task = runtime.spawn(async move {
            let mut ticks = interval_at(start, period);
            loop {
                ticks.tick().await;
                match ewma.upgrade() {
                    Some(ewma) => ewma.lock().tick(),
                    None => break,
                }
            }
        });
        debug!("meter tick task started, interval {:?}", period);
        Self { task: Some(task) }
    }

    /// Cancel the task; later calls do nothing
    pub(crate) fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("meter tick task stopped");
        }
    }

    /// Whether the task is still scheduled
    pub(crate) fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Event rate meter
///
/// Must be created inside a tokio runtime. The tick task never keeps the
/// runtime alive: it is aborted when the meter is dropped or stopped.
///
/// # Example
///
/// ```
/// use flowmetrics::rate::{Meter, MeterConfig};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let requests = Meter::new(MeterConfig::default()).unwrap();
///     requests.mark(1);
///     requests.mark(4);
///
///     // Nothing is folded in until the first tick, 5 s from now
///     assert_eq!(requests.val(), 0.0);
/// }
/// ```
pub struct Meter {
    ewma: Arc<Mutex<Ewma>>,
    ticker: TickHandle,
    rate_unit: Duration,
    used: AtomicBool,
}

impl Meter {
    /// Start a meter on the current tokio runtime
    pub fn new(config: MeterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ewma = Ewma::new(config.time_period, config.tick_interval)?;
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let ewma = Arc::new(Mutex::new(ewma));
        let ticker = TickHandle::spawn(&runtime, Arc::downgrade(&ewma), config.tick_interval);

        Ok(Self {
            ewma,
            ticker,
            rate_unit: config.rate_unit,
            used: AtomicBool::new(false),
        })
    }

    /// Record `n` events
    pub fn mark(&self, n: u64) {
        self.used.store(true, Ordering::Relaxed);
        self.ewma.lock().update(n);
    }

    /// Rate in events per configured unit, rounded to two decimals
    pub fn val(&self) -> f64 {
        (self.rate(self.rate_unit) * 100.0).round() / 100.0
    }

    /// Unrounded rate in events per `unit`
    pub fn rate(&self, unit: Duration) -> f64 {
        self.ewma.lock().rate(unit)
    }

    /// Reporting unit of [`val`](Self::val)
    pub fn rate_unit(&self) -> Duration {
        self.rate_unit
    }

    /// Whether anything has been marked
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    /// Stop ticking; the rate freezes at its current value
    pub fn stop(&mut self) {
        self.ticker.stop();
    }

    /// Whether the tick task is still scheduled
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }
}

impl fmt::Debug for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meter")
            .field("ewma", &*self.ewma.lock())
            .field("rate_unit", &self.rate_unit)
            .field("ticking", &self.is_ticking())
            .finish()
    }
}

impl Metric for Meter {
    fn val(&self) -> Option<f64> {
        Some(Meter::val(self))
    }

    fn is_used(&self) -> bool {
        Meter::is_used(self)
    }
}
