use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::index::TagIndex;
use crate::store::StoreError;
use crate::utils::{self, DEFAULT_DATETIME_FORMAT};

/// The body of a stored entry. On disk each entry is the pair
/// `[timestamp, EntryRecord]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Display copy of the timestamp for people reading the raw file; ignored on load
    #[serde(default)]
    pub datetime_created: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub productive_activities_count: u32,
}

/// Older record shape: `{ "<display datetime>": { content, tags } }`
#[derive(Debug, Clone, Default, Deserialize)]
struct LegacyRecord {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    timestamp: i64,
    datetime_created: String,
    content: String,
    tags: Vec<String>,
    productive_activities_count: u32,
}

impl Entry {
    /// Build an entry. `timestamp` defaults to now. Does not touch any index.
    pub fn new(
        content: impl Into<String>,
        tags: Vec<String>,
        productive_activities_count: u32,
        timestamp: Option<i64>,
    ) -> Self {
        let timestamp = timestamp.unwrap_or_else(utils::current_timestamp);
        Self {
            timestamp,
            datetime_created: utils::format_timestamp(timestamp, DEFAULT_DATETIME_FORMAT),
            content: content.into(),
            tags,
            productive_activities_count,
        }
    }

    /// Build an entry and register its tags in the tag index
    pub fn create(
        content: impl Into<String>,
        tags: Vec<String>,
        productive_activities_count: u32,
        timestamp: Option<i64>,
        tag_index: &TagIndex,
    ) -> Result<Self, StoreError> {
        let entry = Self::new(content, tags, productive_activities_count, timestamp);
        tag_index.add(&entry.tags)?;
        Ok(entry)
    }

    /// Re-derive the cached display string with another strftime format
    pub fn with_datetime_format(mut self, format: &str) -> Self {
        self.datetime_created = utils::format_timestamp(self.timestamp, format);
        self
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn datetime_created(&self) -> &str {
        &self.datetime_created
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn productive_activities_count(&self) -> u32 {
        self.productive_activities_count
    }

    pub fn set_productive_activities_count(&mut self, count: u32) {
        self.productive_activities_count = count;
    }

    pub fn serialize(&self) -> (i64, EntryRecord) {
        (
            self.timestamp,
            EntryRecord {
                datetime_created: self.datetime_created.clone(),
                content: self.content.clone(),
                tags: self.tags.clone(),
                productive_activities_count: self.productive_activities_count,
            },
        )
    }

    /// Rebuild an entry from its stored pair. The display string is recomputed
    /// from the timestamp rather than read back.
    pub fn deserialize((timestamp, record): (i64, EntryRecord)) -> Self {
        Self::new(
            record.content,
            record.tags,
            record.productive_activities_count,
            Some(timestamp),
        )
    }

    /// Parse one raw record from a diary file. Accepts the `[timestamp, {...}]`
    /// pair and the older single-key `{ "<display datetime>": {...} }` object,
    /// whose key is parsed with `datetime_format`.
    pub fn from_value(value: Value, datetime_format: &str) -> Result<Self, String> {
        match value {
            Value::Array(_) => {
                let pair: (i64, EntryRecord) =
                    serde_json::from_value(value).map_err(|e| e.to_string())?;
                Ok(Self::deserialize(pair).with_datetime_format(datetime_format))
            }
            Value::Object(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "expected a single datetime key, found {} keys",
                        map.len()
                    ));
                }
                let Some((display, body)) = map.into_iter().next() else {
                    return Err("empty record".to_string());
                };
                let timestamp = utils::parse_display_datetime(&display, datetime_format)
                    .ok_or_else(|| format!("unrecognised datetime key {:?}", display))?;
                let legacy: LegacyRecord =
                    serde_json::from_value(body).map_err(|e| e.to_string())?;
                Ok(Self::new(legacy.content, legacy.tags, 0, Some(timestamp))
                    .with_datetime_format(datetime_format))
            }
            other => Err(format!("expected an array or object, found {}", other)),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = if self.tags.is_empty() {
            "none".to_string()
        } else {
            self.tags.join(", ")
        };
        write!(
            f,
            "📅 {}\n🏷️ Tags: {}\n{}",
            self.datetime_created, tags, self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    const TS: i64 = 1_700_000_000;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_serialize_round_trip() {
        let entry = Entry::new("Went for a run", tags(&["health", "Exercise"]), 3, Some(TS));

        let back = Entry::deserialize(entry.serialize());

        assert_eq!(back, entry);
        assert_eq!(back.content(), "Went for a run");
        assert_eq!(back.tags(), ["health", "Exercise"]);
        assert_eq!(back.productive_activities_count(), 3);
        assert_eq!(back.timestamp(), TS);
    }

    #[test]
    fn test_serialized_json_shape() {
        let entry = Entry::new("hi", tags(&["a"]), 0, Some(TS));
        let value = serde_json::to_value(entry.serialize()).unwrap();

        assert_eq!(value[0], json!(TS));
        assert_eq!(value[1]["content"], json!("hi"));
        assert_eq!(value[1]["tags"], json!(["a"]));
        assert_eq!(value[1]["productive_activities_count"], json!(0));
        assert_eq!(value[1]["datetime_created"], json!(entry.datetime_created()));
    }

    #[test]
    fn test_display_string_ignores_stored_copy() {
        let record = EntryRecord {
            datetime_created: "tampered".to_string(),
            content: "x".to_string(),
            ..Default::default()
        };
        let entry = Entry::deserialize((TS, record));
        assert_eq!(
            entry.datetime_created(),
            utils::format_timestamp(TS, DEFAULT_DATETIME_FORMAT)
        );
    }

    #[test]
    fn test_minimal_record_uses_defaults() {
        let entry = Entry::from_value(json!([TS, {}]), DEFAULT_DATETIME_FORMAT).unwrap();
        assert_eq!(entry.content(), "");
        assert!(entry.tags().is_empty());
        assert_eq!(entry.productive_activities_count(), 0);
    }

    #[test]
    fn test_legacy_record() {
        let display = utils::format_timestamp(TS, DEFAULT_DATETIME_FORMAT);
        let mut map = serde_json::Map::new();
        map.insert(display.clone(), json!({ "content": "old", "tags": ["x"] }));
        let value = Value::Object(map);

        let entry = Entry::from_value(value, DEFAULT_DATETIME_FORMAT).unwrap();

        assert_eq!(entry.timestamp(), TS);
        assert_eq!(entry.datetime_created(), display);
        assert_eq!(entry.content(), "old");
        assert_eq!(entry.productive_activities_count(), 0);
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        assert!(Entry::from_value(json!("nope"), DEFAULT_DATETIME_FORMAT).is_err());
        assert!(Entry::from_value(json!([TS]), DEFAULT_DATETIME_FORMAT).is_err());
        assert!(Entry::from_value(json!([TS, { "tags": "not-a-list" }]), DEFAULT_DATETIME_FORMAT).is_err());
        assert!(Entry::from_value(json!({ "not a date": {} }), DEFAULT_DATETIME_FORMAT).is_err());
        assert!(Entry::from_value(json!({}), DEFAULT_DATETIME_FORMAT).is_err());
    }

    #[test]
    fn test_create_registers_case_folded_tags() {
        let dir = tempdir().unwrap();
        let index = TagIndex::new(dir.path());

        let entry = Entry::create("run", tags(&["health", "Exercise"]), 0, None, &index).unwrap();

        assert_eq!(entry.tags(), ["health", "Exercise"]);
        assert_eq!(index.load().unwrap(), vec!["exercise", "health"]);
    }

    #[test]
    fn test_set_productive_activities_count() {
        let mut entry = Entry::new("x", Vec::new(), 0, Some(TS));
        entry.set_productive_activities_count(5);
        assert_eq!(entry.productive_activities_count(), 5);
        assert_eq!(entry.timestamp(), TS);
    }

    #[test]
    fn test_display_block() {
        let entry = Entry::new("body", Vec::new(), 0, Some(TS));
        let rendered = entry.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("📅 {}", entry.datetime_created()));
        assert_eq!(lines[1], "🏷️ Tags: none");
        assert_eq!(lines[2], "body");

        let tagged = Entry::new("body", tags(&["a", "b"]), 0, Some(TS));
        assert!(tagged.to_string().contains("🏷️ Tags: a, b"));
    }
}
