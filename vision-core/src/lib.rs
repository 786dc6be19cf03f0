//! Core logic for the vision events card: locale tables, feed normalization,
//! render cooldown and the grouped view model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod card;
pub mod feed;
pub mod locale;
pub mod popup;
pub mod schedule;
pub mod view;

pub use card::{Card, CardUpdate};
pub use feed::{normalize, rewrite_key_frame, RawFeed};
pub use locale::{resolve_icon, Category, LocaleTable, UiText, FALLBACK_ICON};
pub use popup::PopupState;
pub use schedule::RenderState;
pub use view::{build_view, group_by_day, CardView, DateGroup, EventEntry};

/// Entity the card reads when the dashboard config names none.
pub const DEFAULT_CALENDAR_ENTITY: &str = "calendar.llm_vision_events";
pub const DEFAULT_NUMBER_OF_EVENTS: usize = 5;
pub const DEFAULT_REFRESH_INTERVAL: f64 = 1.0;

/// Custom card registration metadata.
pub const CARD_TYPE: &str = "llmvision-card";
pub const CARD_NAME: &str = "LLM Vision Card";
pub const CARD_DESCRIPTION: &str = "Display LLM Vision events on your dashboard";

/// Language of the keyword table and UI strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pl,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pl => "pl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "pl" => Ok(Language::Pl),
            other => Err(CardError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Card configuration as set from the dashboard YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardConfig {
    #[serde(alias = "source_entity")]
    pub calendar_entity: String,
    /// Upper bound on rendered events.
    #[serde(alias = "max_events")]
    pub number_of_events: usize,
    /// Minimum minutes between two renders.
    #[serde(alias = "refresh_interval_minutes")]
    pub refresh_interval: f64,
    pub language: Language,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            calendar_entity: DEFAULT_CALENDAR_ENTITY.to_string(),
            number_of_events: DEFAULT_NUMBER_OF_EVENTS,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            language: Language::En,
        }
    }
}

impl CardConfig {
    /// Configuration offered to the dashboard editor for a freshly added card.
    pub fn stub() -> Self {
        Self::default()
    }
}

/// Host-supplied configuration where every key is optional.
///
/// Unset, empty, zero or otherwise unusable values keep the default, the same
/// way the dashboard treats falsy options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCardConfig {
    #[serde(default, alias = "source_entity")]
    pub calendar_entity: Option<String>,
    #[serde(default, alias = "max_events")]
    pub number_of_events: Option<f64>,
    #[serde(default, alias = "refresh_interval_minutes")]
    pub refresh_interval: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
}

impl TryFrom<RawCardConfig> for CardConfig {
    type Error = CardError;

    fn try_from(raw: RawCardConfig) -> Result<Self, Self::Error> {
        let mut base = CardConfig::default();
        if let Some(entity) = raw.calendar_entity.filter(|entity| !entity.trim().is_empty()) {
            base.calendar_entity = entity.trim().to_string();
        }
        if let Some(count) = raw.number_of_events.filter(|n| n.is_finite() && *n >= 1.0) {
            base.number_of_events = count as usize;
        }
        if let Some(minutes) = raw.refresh_interval.filter(|m| m.is_finite() && *m > 0.0) {
            base.refresh_interval = minutes;
        }
        if let Some(language) = raw.language.filter(|lang| !lang.trim().is_empty()) {
            base.language = language.parse()?;
        }
        Ok(base)
    }
}

/// One detection event, newest-first position in the feed is its only identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub label: String,
    pub summary: String,
    /// `None` when the source timestamp could not be parsed.
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Web-servable key frame URL.
    pub key_frame: Option<String>,
    pub camera_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Calendar entity not found: {0}")]
    EntityNotFound(String),
    #[error("Could not read input: {0}")]
    Parse(String),
    #[error("Unsupported language: {0}")]
    UnknownLanguage(String),
    #[error("Invalid locale bundle: {0}")]
    Locale(String),
}
