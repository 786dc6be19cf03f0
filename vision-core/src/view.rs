//! Pure view model: records grouped by calendar day with display fields.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::locale::LocaleTable;
use crate::EventRecord;

const UNKNOWN_TIME: &str = "--:--";

/// Everything the presentation layer needs to draw the card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardView {
    pub groups: Vec<DateGroup>,
    /// Text shown instead of the list when the source has no events.
    pub placeholder: Option<String>,
}

impl CardView {
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = &EventEntry> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }
}

/// Contiguous run of events sharing a day label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateGroup {
    pub label: String,
    pub entries: Vec<EventEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEntry {
    /// 1-based position in the rendered list.
    pub position: usize,
    pub title: String,
    pub icon: String,
    pub time: String,
    /// `time • camera`, or the time alone.
    pub secondary: String,
    pub summary: String,
    pub key_frame: Option<String>,
    pub camera: Option<String>,
    pub alt: String,
}

/// Group up to `cap` newest-first records by local calendar day of `now`.
pub fn group_by_day<Tz: TimeZone>(
    records: &[EventRecord],
    cap: usize,
    locale: &LocaleTable,
    now: &DateTime<Tz>,
) -> Vec<DateGroup> {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut groups: Vec<DateGroup> = Vec::new();

    for (index, record) in records.iter().take(cap).enumerate() {
        let local = record
            .start_time
            .map(|start| start.with_timezone(&tz).fixed_offset());
        let label = day_label(local.as_ref().map(DateTime::date_naive), today, locale);
        let entry = build_entry(index + 1, record, local.as_ref(), locale);

        match groups.last_mut() {
            Some(group) if group.label == label => group.entries.push(entry),
            _ => groups.push(DateGroup {
                label,
                entries: vec![entry],
            }),
        }
    }

    groups
}

/// Full view for a rendered pass, with the empty placeholder when needed.
pub fn build_view<Tz: TimeZone>(
    records: &[EventRecord],
    cap: usize,
    locale: &LocaleTable,
    now: &DateTime<Tz>,
) -> CardView {
    let groups = group_by_day(records, cap, locale, now);
    let placeholder = groups
        .is_empty()
        .then(|| locale.text().no_events.clone());
    CardView {
        groups,
        placeholder,
    }
}

fn day_label(date: Option<NaiveDate>, today: NaiveDate, locale: &LocaleTable) -> String {
    let text = locale.text();
    let Some(date) = date else {
        return text.unknown_date.clone();
    };

    if date == today {
        text.today.clone()
    } else if Some(date) == today.pred_opt() {
        text.yesterday.clone()
    } else {
        date.format("%b %-d").to_string()
    }
}

fn build_entry(
    position: usize,
    record: &EventRecord,
    local_start: Option<&DateTime<FixedOffset>>,
    locale: &LocaleTable,
) -> EventEntry {
    let time = local_start
        .map(|start| start.format("%H:%M").to_string())
        .unwrap_or_else(|| UNKNOWN_TIME.to_string());
    let secondary = secondary_line(&time, record.camera_name.as_deref());

    EventEntry {
        position,
        title: record.label.clone(),
        icon: locale.resolve_icon(&record.label).to_string(),
        time,
        secondary,
        summary: record.summary.clone(),
        key_frame: record.key_frame.clone(),
        camera: record.camera_name.clone(),
        alt: format!("Key frame {position}"),
    }
}

/// Secondary line under the event title.
pub fn secondary_line(time: &str, camera: Option<&str>) -> String {
    match camera {
        Some(camera) if !camera.is_empty() => format!("{time} • {camera}"),
        _ => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Language;
    use pretty_assertions::assert_eq;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap()
    }

    fn record(label: &str, start: &str, camera: Option<&str>) -> EventRecord {
        EventRecord {
            label: label.to_string(),
            summary: format!("{label} summary"),
            start_time: DateTime::parse_from_rfc3339(start).ok(),
            key_frame: None,
            camera_name: camera.map(str::to_string),
        }
    }

    fn en() -> LocaleTable {
        LocaleTable::builtin(Language::En).unwrap()
    }

    fn labels(groups: &[DateGroup]) -> Vec<(&str, usize)> {
        groups
            .iter()
            .map(|group| (group.label.as_str(), group.entries.len()))
            .collect()
    }

    #[test]
    fn groups_today_yesterday_and_older() {
        let records = vec![
            record("Person", "2024-10-17T09:00:00+02:00", None),
            record("Car", "2024-10-17T08:00:00+02:00", None),
            record("Dog", "2024-10-16T22:15:00+02:00", None),
            record("Parcel", "2024-10-05T07:05:00+02:00", None),
        ];

        let groups = group_by_day(&records, 10, &en(), &now());
        assert_eq!(
            labels(&groups),
            vec![("Today", 2), ("Yesterday", 1), ("Oct 5", 1)]
        );
    }

    #[test]
    fn day_boundary_uses_local_calendar_days() {
        // 23:30 local yesterday is less than 24 hours before noon today
        let records = vec![
            record("Person", "2024-10-17T00:10:00+02:00", None),
            record("Person", "2024-10-16T23:30:00+02:00", None),
        ];

        let groups = group_by_day(&records, 10, &en(), &now());
        assert_eq!(labels(&groups), vec![("Today", 1), ("Yesterday", 1)]);
    }

    #[test]
    fn offsets_are_converted_before_grouping() {
        // 23:00 UTC on the 16th is 01:00 on the 17th at +02:00
        let records = vec![record("Person", "2024-10-16T23:00:00+00:00", None)];

        let groups = group_by_day(&records, 10, &en(), &now());
        assert_eq!(labels(&groups), vec![("Today", 1)]);
        assert_eq!(groups[0].entries[0].time, "01:00");
    }

    #[test]
    fn cap_limits_rendered_entries() {
        let records = vec![
            record("a", "2024-10-17T09:00:00+02:00", None),
            record("b", "2024-10-17T08:00:00+02:00", None),
            record("c", "2024-10-17T07:00:00+02:00", None),
        ];

        let view = build_view(&records, 2, &en(), &now());
        assert_eq!(view.entry_count(), 2);
        let titles: Vec<_> = view.entries().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn labels_recurring_after_a_gap_open_new_groups() {
        let records = vec![
            record("a", "2024-10-17T09:00:00+02:00", None),
            record("b", "2024-10-16T09:00:00+02:00", None),
            record("c", "2024-10-17T07:00:00+02:00", None),
        ];

        let groups = group_by_day(&records, 10, &en(), &now());
        assert_eq!(
            labels(&groups),
            vec![("Today", 1), ("Yesterday", 1), ("Today", 1)]
        );
    }

    #[test]
    fn entry_fields() {
        let records = vec![
            record("Person", "2024-10-17T09:05:00+02:00", Some("Front door")),
            record("Rain", "2024-10-17T08:00:00+02:00", None),
        ];

        let view = build_view(&records, 5, &en(), &now());
        let entries: Vec<_> = view.entries().cloned().collect();

        assert_eq!(
            entries[0],
            EventEntry {
                position: 1,
                title: "Person".to_string(),
                icon: "mdi:walk".to_string(),
                time: "09:05".to_string(),
                secondary: "09:05 • Front door".to_string(),
                summary: "Person summary".to_string(),
                key_frame: None,
                camera: Some("Front door".to_string()),
                alt: "Key frame 1".to_string(),
            }
        );
        assert_eq!(entries[1].secondary, "08:00");
        assert_eq!(entries[1].icon, crate::FALLBACK_ICON);
        assert_eq!(entries[1].alt, "Key frame 2");
    }

    #[test]
    fn unreadable_start_is_kept_under_unknown_date() {
        let mut broken = record("Person", "2024-10-17T09:00:00+02:00", None);
        broken.start_time = None;

        let groups = group_by_day(&[broken], 5, &en(), &now());
        assert_eq!(labels(&groups), vec![("Unknown date", 1)]);
        assert_eq!(groups[0].entries[0].time, "--:--");
    }

    #[test]
    fn empty_feed_shows_placeholder() {
        let view = build_view(&[], 5, &en(), &now());
        assert!(view.groups.is_empty());
        assert_eq!(view.placeholder.as_deref(), Some("No events"));

        let polish = LocaleTable::builtin(Language::Pl).unwrap();
        let view = build_view(&[], 5, &polish, &now());
        assert_eq!(view.placeholder.as_deref(), Some("Brak aktywnosci"));
    }

    #[test]
    fn polish_day_labels() {
        let polish = LocaleTable::builtin(Language::Pl).unwrap();
        let records = vec![
            record("Kot", "2024-10-17T09:00:00+02:00", None),
            record("Pies", "2024-10-16T09:00:00+02:00", None),
        ];

        let groups = group_by_day(&records, 5, &polish, &now());
        assert_eq!(labels(&groups), vec![("Dzis", 1), ("Wczoraj", 1)]);
    }
}
