//! Home Assistant state JSON to `CardView` converter.

use chrono::{DateTime, TimeZone};
use log::warn;
use serde_json::Value;
use vision_core::{Card, CardConfig, CardError, CardUpdate, CardView, RawFeed};

/// The `states` map of a `hass` object, or `value` itself when it already is one.
pub fn states_map(value: &Value) -> &Value {
    match value.get("states") {
        Some(states) if states.is_object() => states,
        _ => value,
    }
}

/// Read the feed out of one entity state object (`{ "state": .., "attributes": {..} }`).
///
/// Attributes that are missing or malformed degrade to an empty feed.
pub fn feed_from_entity(entity: &Value) -> RawFeed {
    match entity.get("attributes") {
        Some(attributes) if attributes.is_object() => {
            serde_json::from_value(attributes.clone()).unwrap_or_else(|err| {
                warn!("Unreadable entity attributes, treating feed as empty: {err}");
                RawFeed::default()
            })
        }
        Some(Value::Null) | None => {
            warn!("Entity has no attributes, treating feed as empty");
            RawFeed::default()
        }
        Some(other) => {
            warn!("Entity attributes are not an object ({other}), treating feed as empty");
            RawFeed::default()
        }
    }
}

/// Look up `entity_id` in a states map. `None` when the entity is absent.
pub fn lookup_feed(states: &Value, entity_id: &str) -> Option<RawFeed> {
    states_map(states).get(entity_id).map(feed_from_entity)
}

/// Like [`lookup_feed`] but an absent entity is an error.
pub fn require_feed(states: &Value, entity_id: &str) -> Result<RawFeed, CardError> {
    lookup_feed(states, entity_id).ok_or_else(|| CardError::EntityNotFound(entity_id.to_string()))
}

/// Render a view from a states JSON string.
pub fn summarize_states_str<Tz: TimeZone>(
    states_json: &str,
    config: &CardConfig,
    now: &DateTime<Tz>,
) -> Result<CardView, CardError> {
    let value: Value =
        serde_json::from_str(states_json).map_err(|err| CardError::Parse(err.to_string()))?;
    summarize_states_value(&value, config, now)
}

/// Render a view from a states map (or whole `hass` object) in one pass.
///
/// A missing calendar entity is logged and yields an empty view.
pub fn summarize_states_value<Tz: TimeZone>(
    states: &Value,
    config: &CardConfig,
    now: &DateTime<Tz>,
) -> Result<CardView, CardError> {
    let feed = lookup_feed(states, &config.calendar_entity);
    let mut card = Card::new(config.clone())?;

    match card.on_state_push(feed.as_ref(), now) {
        CardUpdate::Render(view) => Ok(view),
        // a fresh card always renders its first push
        CardUpdate::Suppressed => Ok(CardView::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    fn states() -> Value {
        json!({
            "calendar.llm_vision_events": {
                "state": "off",
                "attributes": {
                    "events": ["Person"],
                    "summaries": ["Someone at the gate."],
                    "key_frames": ["/config/www/llmvision/gate_0"],
                    "camera_names": ["Gate"],
                    "starts": ["2024-10-17T09:00:00+00:00"]
                }
            },
            "sun.sun": { "state": "above_horizon", "attributes": {} }
        })
    }

    #[test]
    fn accepts_states_map_or_hass_object() {
        let hass = json!({ "states": states(), "language": "en" });

        let from_map = lookup_feed(&states(), "calendar.llm_vision_events");
        let from_hass = lookup_feed(&hass, "calendar.llm_vision_events");
        assert_eq!(from_map, from_hass);
        assert_eq!(from_map.unwrap().events, vec!["Person"]);
    }

    #[test]
    fn absent_entity_is_none_or_error() {
        assert_eq!(lookup_feed(&states(), "calendar.other"), None);
        assert!(matches!(
            require_feed(&states(), "calendar.other"),
            Err(CardError::EntityNotFound(id)) if id == "calendar.other"
        ));
    }

    #[test]
    fn entity_without_attributes_is_an_empty_feed() {
        let feed = feed_from_entity(&json!({ "state": "unavailable" }));
        assert!(feed.is_empty());
    }

    #[test]
    fn non_object_attributes_are_an_empty_feed() {
        assert!(feed_from_entity(&json!({ "attributes": "broken" })).is_empty());
        assert!(feed_from_entity(&json!({ "attributes": [1, 2] })).is_empty());
    }

    #[test]
    fn broken_attributes_render_the_placeholder() {
        let states = json!({
            "calendar.llm_vision_events": { "state": "off", "attributes": "broken" }
        });
        let view = summarize_states_value(&states, &CardConfig::default(), &Utc::now()).unwrap();
        assert!(view.groups.is_empty());
        assert_eq!(view.placeholder.as_deref(), Some("No events"));
    }

    #[test]
    fn missing_entity_yields_empty_view() {
        let config = CardConfig {
            calendar_entity: "calendar.missing".to_string(),
            ..CardConfig::default()
        };
        let view = summarize_states_value(&states(), &config, &Utc::now()).unwrap();
        assert!(view.groups.is_empty());
        assert_eq!(view.placeholder, None);
    }

    #[test]
    fn renders_from_json_string() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 10, 17, 18, 0, 0)
            .unwrap();
        let view =
            summarize_states_str(&states().to_string(), &CardConfig::default(), &now).unwrap();

        assert_eq!(view.groups.len(), 1);
        let entry = &view.groups[0].entries[0];
        assert_eq!(entry.secondary, "09:00 • Gate");
        assert_eq!(entry.key_frame.as_deref(), Some("/local/llmvision/gate_0.jpg"));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            summarize_states_str("{not json", &CardConfig::default(), &Utc::now()),
            Err(CardError::Parse(_))
        ));
    }
}
