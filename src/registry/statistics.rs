//! Tag-keyed statistics registry

use std::collections::btree_map::{self, BTreeMap};

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::report::{Report, TagReport};
use super::summary::Summary;
use crate::scalar::Counter;
use crate::time::{Clock, SystemClock};
use crate::traits::Metric;

/// What a tag accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Signed count, moved by `incr`/`decr`
    Counter,
    /// Running min/max/avg, fed by `add` and timers
    Samples,
    /// Arbitrary JSON value, replaced by `set`
    Data,
}

/// Accumulated state of one tag
#[derive(Clone, Debug, PartialEq)]
pub enum TagValue {
    Counter(Counter),
    Samples(Summary),
    Data(Option<Value>),
}

impl TagValue {
    fn empty(kind: TagKind) -> Self {
        match kind {
            TagKind::Counter => TagValue::Counter(Counter::default()),
            TagKind::Samples => TagValue::Samples(Summary::new()),
            TagKind::Data => TagValue::Data(None),
        }
    }
}

/// A registered tag
#[derive(Clone, Debug, PartialEq)]
pub struct TagEntry {
    title: String,
    value: TagValue,
}

impl TagEntry {
    pub fn kind(&self) -> TagKind {
        match self.value {
            TagValue::Counter(_) => TagKind::Counter,
            TagValue::Samples(_) => TagKind::Samples,
            TagValue::Data(_) => TagKind::Data,
        }
    }

    /// Human-readable title; the tag itself unless one was given
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn value(&self) -> &TagValue {
        &self.value
    }

    fn flush(&mut self) {
        self.value = TagValue::empty(self.kind());
    }
}

impl Metric for TagEntry {
    /// Count for counters, running mean for samples, numeric data as-is
    fn val(&self) -> Option<f64> {
        match &self.value {
            TagValue::Counter(counter) => counter.val(),
            TagValue::Samples(summary) => summary.val(),
            TagValue::Data(data) => data.as_ref().and_then(Value::as_f64),
        }
    }

    fn is_used(&self) -> bool {
        match &self.value {
            TagValue::Counter(counter) => counter.is_used(),
            TagValue::Samples(summary) => summary.is_used(),
            TagValue::Data(data) => data.is_some(),
        }
    }
}

/// Process identity stamped on every report
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    pub app_name: Option<String>,
    pub app_instance: u32,
}

impl StatisticsConfig {
    /// Set the application name
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Set the instance index
    pub fn with_app_instance(mut self, instance: u32) -> Self {
        self.app_instance = instance;
        self
    }
}

/// Registry of named counters, sample summaries and data values
///
/// Tags must be registered with [`init`](Self::init) before use. Writes to
/// an unknown tag, or of the wrong kind, are dropped.
///
/// # Example
///
/// ```
/// use flowmetrics::registry::{Statistics, StatisticsConfig, TagKind};
///
/// let mut stats = Statistics::new(StatisticsConfig::default().with_app_name("api"));
/// stats
///     .init(TagKind::Counter, "requests", None)
///     .init(TagKind::Samples, "latency", Some("Latency (ms)"));
///
/// stats.incr("requests", 1).add("latency", 12.0).add("latency", 20.0);
///
/// let report = stats.report();
/// assert_eq!(report.list.len(), 2);
/// assert_eq!(report.list[0].avg, Some(16.0));
/// ```
#[derive(Clone, Debug)]
pub struct Statistics<C = SystemClock> {
    tags: BTreeMap<String, TagEntry>,
    config: StatisticsConfig,
    pid: u32,
    clock: C,
}

impl Statistics {
    /// Registry reading the system clock
    pub fn new(config: StatisticsConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new(StatisticsConfig::default())
    }
}

impl<C: Clock> Statistics<C> {
    /// Registry with an explicit clock for timers and report timestamps
    pub fn with_clock(config: StatisticsConfig, clock: C) -> Self {
        Self {
            tags: BTreeMap::new(),
            config,
            pid: std::process::id(),
            clock,
        }
    }

    /// Register `tag`, replacing any previous registration
    pub fn init(&mut self, kind: TagKind, tag: impl Into<String>, title: Option<&str>) -> &mut Self {
        let tag = tag.into();
        let entry = TagEntry {
            title: title.map_or_else(|| tag.clone(), str::to_owned),
            value: TagValue::empty(kind),
        };
        self.tags.insert(tag, entry);
        self
    }

    pub fn get(&self, tag: &str) -> Option<&TagEntry> {
        self.tags.get(tag)
    }

    /// Add `n` to a counter tag
    pub fn incr(&mut self, tag: &str, n: i64) -> &mut Self {
        match self.value_mut(tag) {
            Some(TagValue::Counter(counter)) => counter.inc(n),
            _ => trace!("incr on non-counter tag {:?} dropped", tag),
        }
        self
    }

    /// Subtract `n` from a counter tag
    pub fn decr(&mut self, tag: &str, n: i64) -> &mut Self {
        match self.value_mut(tag) {
            Some(TagValue::Counter(counter)) => counter.dec(n),
            _ => trace!("decr on non-counter tag {:?} dropped", tag),
        }
        self
    }

    /// Fold a value into a samples tag
    pub fn add(&mut self, tag: &str, value: f64) -> &mut Self {
        match self.value_mut(tag) {
            Some(TagValue::Samples(summary)) => summary.add(value),
            _ => trace!("add on non-samples tag {:?} dropped", tag),
        }
        self
    }

    /// Replace the value of a data tag
    pub fn set(&mut self, tag: &str, data: impl Into<Value>) -> &mut Self {
        match self.value_mut(tag) {
            Some(TagValue::Data(slot)) => *slot = Some(data.into()),
            _ => trace!("set on non-data tag {:?} dropped", tag),
        }
        self
    }

    /// Start timing an operation recorded under `tag`
    pub fn timer(&self, tag: impl Into<String>) -> Timer {
        Timer {
            tag: tag.into(),
            start: self.clock.now_millis(),
        }
    }

    /// Snapshot every tag
    pub fn report(&self) -> Report {
        Report {
            pid: self.pid,
            app_instance: self.config.app_instance,
            app_name: self.config.app_name.clone(),
            time: self.clock.now_millis(),
            list: self
                .tags
                .iter()
                .map(|(tag, entry)| TagReport::new(tag, entry))
                .collect(),
        }
    }

    /// [`report`](Self::report) rendered as JSON
    pub fn json_report(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.report())
    }

    fn value_mut(&mut self, tag: &str) -> Option<&mut TagValue> {
        self.tags.get_mut(tag).map(|entry| &mut entry.value)
    }
}

impl<C> Statistics<C> {
    /// Reset every tag's value, keeping the registrations
    pub fn flush(&mut self) {
        for entry in self.tags.values_mut() {
            entry.flush();
        }
    }

    /// Registered tags with their entries, ordered by tag
    pub fn iter(&self) -> btree_map::Iter<'_, String, TagEntry> {
        self.tags.iter()
    }

    /// Number of registered tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Elapsed-time recorder returned by [`Statistics::timer`]
///
/// Finishing consumes the timer and adds the elapsed milliseconds to the
/// samples tag `tag`, `{tag}_success` or `{tag}_error`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a timer records nothing until it is finished"]
pub struct Timer {
    tag: String,
    start: u64,
}

impl Timer {
    /// Record under the timer's own tag
    pub fn end<C: Clock>(self, stats: &mut Statistics<C>) {
        let elapsed = self.elapsed(stats);
        stats.add(&self.tag, elapsed);
    }

    /// Record under `{tag}_success`
    pub fn ok<C: Clock>(self, stats: &mut Statistics<C>) {
        self.end_as("success", stats);
    }

    /// Record under `{tag}_error`
    pub fn err<C: Clock>(self, stats: &mut Statistics<C>) {
        self.end_as("error", stats);
    }

    /// Record under `{tag}_{outcome}`
    pub fn end_as<C: Clock>(self, outcome: &str, stats: &mut Statistics<C>) {
        let elapsed = self.elapsed(stats);
        stats.add(&format!("{}_{}", self.tag, outcome), elapsed);
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn elapsed<C: Clock>(&self, stats: &Statistics<C>) -> f64 {
        stats.clock.now_millis().saturating_sub(self.start) as f64
    }
}
