use std::fs;

use chrono::{DateTime, FixedOffset, TimeZone};
use pretty_assertions::assert_eq;
use serde_json::Value;
use vision_core::{CardConfig, Language};
use vision_hass::summarize_states_str;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn noon() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 10, 17, 12, 0, 0)
        .unwrap()
}

#[test]
fn driveway_states_match_golden() {
    let states = fs::read_to_string(fixture_path("driveway_states.json"))
        .expect("could not read states fixture");

    let view = summarize_states_str(&states, &CardConfig::default(), &noon())
        .expect("could not build view");
    let actual = serde_json::to_value(view).expect("could not serialize view");

    let expected = fs::read_to_string(fixture_path("driveway_view.json"))
        .expect("could not read golden view");
    let expected: Value = serde_json::from_str(&expected).expect("golden is not valid JSON");

    assert_eq!(actual, expected);
}

#[test]
fn polish_labels_and_cap() {
    let states = fs::read_to_string(fixture_path("driveway_states.json"))
        .expect("could not read states fixture");
    let config = CardConfig {
        number_of_events: 3,
        language: Language::Pl,
        ..CardConfig::default()
    };

    let view = summarize_states_str(&states, &config, &noon()).expect("could not build view");
    let labels: Vec<_> = view
        .groups
        .iter()
        .map(|group| (group.label.as_str(), group.entries.len()))
        .collect();

    assert_eq!(labels, vec![("Dzis", 2), ("Wczoraj", 1)]);
}
