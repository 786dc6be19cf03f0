//! Normalization of the calendar entity's parallel attribute arrays.

use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::EventRecord;

const LOCAL_WWW_PREFIX: &str = "/config/www/";
const SERVED_PREFIX: &str = "/local/";
const KEY_FRAME_EXTENSION: &str = ".jpg";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Attributes of the calendar entity, each array ordered oldest-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawFeed {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub events: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub summaries: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub key_frames: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub camera_names: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub starts: Vec<String>,
}

impl RawFeed {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

/// Build newest-first records from the feed.
///
/// Every array is reversed on its own, so shorter optional arrays stay aligned
/// with the newest events. Labels and start times bound the record count.
/// Records are then stably ordered by start time, newest first, which leaves a
/// well-ordered feed untouched; unreadable starts sink to the end.
pub fn normalize<Tz: TimeZone>(feed: &RawFeed, max_count: usize, tz: &Tz) -> Vec<EventRecord> {
    let available = feed.events.len().min(feed.starts.len());

    let mut records: Vec<EventRecord> = (0..available)
        .map(|i| {
            let raw_start = newest(&feed.starts, i);
            let start_time = parse_start(raw_start, tz);
            if start_time.is_none() {
                warn!("Unreadable start time {raw_start:?} for event {}", newest(&feed.events, i));
            }

            EventRecord {
                label: newest(&feed.events, i).to_string(),
                summary: newest(&feed.summaries, i).to_string(),
                start_time,
                key_frame: rewrite_key_frame(newest(&feed.key_frames, i)),
                camera_name: non_empty(newest(&feed.camera_names, i)),
            }
        })
        .collect();

    records.sort_by_key(|record| Reverse(record.start_time));
    records.truncate(max_count);
    records
}

/// Entry `i` counted from the end of an oldest-first array.
fn newest(items: &[String], i: usize) -> &str {
    items
        .len()
        .checked_sub(i + 1)
        .and_then(|idx| items.get(idx))
        .map(String::as_str)
        .unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Map a stored key frame path under `/config/www/` to its `/local/` URL.
pub fn rewrite_key_frame(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some(format!(
        "{}{KEY_FRAME_EXTENSION}",
        path.replacen(LOCAL_WWW_PREFIX, SERVED_PREFIX, 1)
    ))
}

/// Parse an event start. Timestamps without an offset are wall-clock time in `tz`.
pub fn parse_start<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(parsed);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.fixed_offset())
}
