//! Data shapes for log ingestion and query.

use crate::canonical::QueryValue;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One log record.
#[derive(Debug, Clone, Default)]
pub struct LogEntry {
    /// Arbitrary structured content of the record.
    pub content: Map<String, Value>,
    /// Record time in seconds since the epoch; the service fills in the
    /// receive time when absent.
    pub time: Option<i64>,
    /// Nanosecond part of the record time.
    pub time_ns_part: Option<i64>,
}

impl LogEntry {
    /// Create a log record from its content.
    pub fn new(content: Map<String, Value>) -> Self {
        Self {
            content,
            time: None,
            time_ns_part: None,
        }
    }

    /// Set the record time.
    pub fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the nanosecond part of the record time.
    pub fn with_time_ns_part(mut self, ns: i64) -> Self {
        self.time_ns_part = Some(ns);
        self
    }

    fn to_json(&self) -> Value {
        let mut m = self.content.clone();
        if let Some(time) = self.time {
            m.insert("__time__".to_string(), Value::from(time));
        }
        if let Some(ns) = self.time_ns_part {
            m.insert("__time_ns_part__".to_string(), Value::from(ns));
        }

        Value::Object(m)
    }
}

/// A batch of log records with optional tags, topic and source.
#[derive(Debug, Clone, Default)]
pub struct LogData {
    /// The records to ingest.
    pub logs: Vec<LogEntry>,
    /// Tags attached to the whole batch.
    pub tags: Option<Vec<BTreeMap<String, String>>>,
    /// Topic of the batch.
    pub topic: Option<String>,
    /// Source of the batch.
    pub source: Option<String>,
}

impl LogData {
    /// Serialize into the JSON body shape the ingestion endpoint expects.
    pub fn to_body(&self) -> Value {
        let mut m = Map::new();
        m.insert(
            "__logs__".to_string(),
            Value::Array(self.logs.iter().map(LogEntry::to_json).collect()),
        );
        if let Some(tags) = &self.tags {
            m.insert(
                "__tags__".to_string(),
                serde_json::to_value(tags).unwrap_or_default(),
            );
        }
        if let Some(topic) = &self.topic {
            m.insert("__topic__".to_string(), Value::from(topic.clone()));
        }
        if let Some(source) = &self.source {
            m.insert("__source__".to_string(), Value::from(source.clone()));
        }

        Value::Object(m)
    }
}

/// Query for fetching logs from a logstore.
#[derive(Debug, Clone, Default)]
pub struct GetLogsQuery {
    /// Start of the time range, seconds since the epoch, inclusive.
    pub from: i64,
    /// End of the time range, seconds since the epoch, exclusive.
    pub to: i64,
    /// Query statement.
    pub query: Option<String>,
    /// Topic to filter on.
    pub topic: Option<String>,
    /// Maximum number of rows to return.
    pub line: Option<i64>,
    /// Row offset for paging.
    pub offset: Option<i64>,
    /// Return rows in reverse time order.
    pub reverse: Option<bool>,
    /// Enable SQL enhanced mode.
    pub power_sql: Option<bool>,
}

impl GetLogsQuery {
    /// Convert into query parameter pairs, absent fields omitted.
    pub fn to_queries(&self) -> Vec<(String, QueryValue)> {
        let mut queries = vec![
            ("from".to_string(), QueryValue::from(self.from)),
            ("to".to_string(), QueryValue::from(self.to)),
        ];
        if let Some(v) = &self.query {
            queries.push(("query".to_string(), QueryValue::from(v.clone())));
        }
        if let Some(v) = &self.topic {
            queries.push(("topic".to_string(), QueryValue::from(v.clone())));
        }
        if let Some(v) = self.line {
            queries.push(("line".to_string(), QueryValue::from(v)));
        }
        if let Some(v) = self.offset {
            queries.push(("offset".to_string(), QueryValue::from(v)));
        }
        if let Some(v) = self.reverse {
            queries.push(("reverse".to_string(), QueryValue::from(v)));
        }
        if let Some(v) = self.power_sql {
            queries.push(("powerSql".to_string(), QueryValue::from(v)));
        }

        queries
    }
}

/// One row returned by a log query.
///
/// The service prefixes its own columns with double underscores; everything
/// else lands in `fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetLogsEntry {
    /// Topic of the row.
    #[serde(rename = "__topic__", default)]
    pub topic: String,
    /// Source of the row.
    #[serde(rename = "__source__", default)]
    pub source: String,
    /// Record time, seconds since the epoch.
    #[serde(rename = "__time__", default)]
    pub time: String,
    /// Nanosecond part of the record time.
    #[serde(rename = "__time_ns_part__", default)]
    pub time_ns_part: String,
    /// User columns of the row.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
