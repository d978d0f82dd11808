//! Store document and record types

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Version written into every store this binary produces
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current UTC time as ISO-8601 with millisecond precision
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Root store document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// haetae version that last merged into this store
    pub version: String,

    /// Records per command; each list keeps insertion order
    #[serde(default)]
    pub commands: BTreeMap<String, Vec<Record>>,
}

impl Store {
    /// Empty store stamped with the current version
    pub fn new() -> Self {
        Self {
            version: PACKAGE_VERSION.to_string(),
            commands: BTreeMap::new(),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// One execution snapshot
///
/// `time` and `env` are reserved; everything the run producer returned is
/// flattened next to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// When the record was made; haetae writes ISO-8601 strings, older
    /// stores may hold epoch numbers
    pub time: Value,

    /// Environment fingerprint; `null` when a stored record lacks one
    #[serde(default)]
    pub env: Value,

    /// Fields from the run producer
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(time: impl Into<Value>, env: Value, data: Map<String, Value>) -> Self {
        Self {
            time: time.into(),
            env,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_flattens_data() {
        let mut data = Map::new();
        data.insert("durationMs".to_string(), json!(120));
        let record = Record::new("2024-05-01T10:00:00.000Z", json!({"os": "linux"}), data);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"time": "2024-05-01T10:00:00.000Z", "env": {"os": "linux"}, "durationMs": 120})
        );
    }

    #[test]
    fn record_serializes_reserved_fields_first() {
        let mut data = Map::new();
        data.insert("a".to_string(), json!(1));
        let record = Record::new("t", json!({}), data);

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"time":"t","env":{},"a":1}"#);
    }

    #[test]
    fn record_collects_extra_fields() {
        let record: Record =
            serde_json::from_str(r#"{"time":"t","env":{"k":"v"},"data":{"x":1},"ok":true}"#)
                .unwrap();

        assert_eq!(record.env, json!({"k": "v"}));
        assert_eq!(record.data.len(), 2);
        assert_eq!(record.data["ok"], json!(true));
    }

    #[test]
    fn record_accepts_numeric_time_and_missing_env() {
        let record: Record = serde_json::from_str(r#"{"time":1714557600000,"ok":true}"#).unwrap();

        assert_eq!(record.time, json!(1714557600000u64));
        assert_eq!(record.env, Value::Null);
        assert_eq!(record.data["ok"], json!(true));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"time":1714557600000,"env":null,"ok":true}"#
        );
    }

    #[test]
    fn store_without_commands_deserializes() {
        let store: Store = serde_json::from_str(r#"{"version":"1.0.0"}"#).unwrap();
        assert!(store.commands.is_empty());
    }

    #[test]
    fn new_store_has_current_version() {
        let store = Store::new();
        assert_eq!(store.version, PACKAGE_VERSION);
        assert!(store.commands.is_empty());
    }

    #[test]
    fn now_iso_is_utc_millis() {
        let time = now_iso();
        assert!(time.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&time).is_ok());
        // 2024-05-01T10:00:00.000Z
        assert_eq!(time.len(), 24);
    }
}
