//! Serializable registry snapshot

use serde::Serialize;
use serde_json::Value;

use super::statistics::{TagEntry, TagKind, TagValue};

/// Point-in-time report over every registered tag
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Reporting process id
    pub pid: u32,
    /// Instance index within a multi-process deployment
    pub app_instance: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Epoch milliseconds at which the report was taken
    pub time: u64,
    /// One row per tag, ordered by tag name
    pub list: Vec<TagReport>,
}

/// One tag's row in a [`Report`]
///
/// Fields that do not apply to the tag's kind are left out of the JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TagReport {
    pub tag: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl TagReport {
    pub(crate) fn new(tag: &str, entry: &TagEntry) -> Self {
        let mut row = Self {
            tag: tag.to_owned(),
            kind: entry.kind(),
            title: entry.title().to_owned(),
            counter: None,
            min: None,
            max: None,
            avg: None,
            data: None,
        };

        match entry.value() {
            TagValue::Counter(counter) => row.counter = Some(counter.count()),
            TagValue::Samples(summary) => {
                row.counter = Some(i64::try_from(summary.count()).unwrap_or(i64::MAX));
                row.min = summary.min();
                row.max = summary.max();
                // Averages over several values are reported to 4 decimals
                row.avg = match summary.count() {
                    0 | 1 => summary.avg(),
                    _ => summary.avg().map(|avg| (avg * 1e4).round() / 1e4),
                };
            }
            TagValue::Data(data) => row.data = Some(data.clone().unwrap_or(Value::Null)),
        }
        row
    }
}
