//! Keyword tables that map free-text event labels to icons.

use serde::{Deserialize, Serialize};

use crate::{CardError, Language};

/// Icon used when no keyword of the active table matches the label.
pub const FALLBACK_ICON: &str = "mdi:calendar-alert";

const EN_BUNDLE: &str = include_str!("../locales/en.json");
const PL_BUNDLE: &str = include_str!("../locales/pl.json");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    People,
    Vehicles,
    Animals,
    Packages,
    Entities,
    Nature,
}

/// Static strings shown by the card itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiText {
    pub no_events: String,
    pub today: String,
    pub yesterday: String,
    pub unknown_date: String,
}

#[derive(Deserialize)]
struct LocaleBundle {
    language: Language,
    text: UiText,
    categories: Vec<CategoryBundle>,
}

#[derive(Deserialize)]
struct CategoryBundle {
    name: Category,
    objects: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct KeywordEntry {
    category: Category,
    /// Lowercased; matching ignores case.
    keyword: String,
    icon: String,
}

/// A compiled locale: UI strings plus one ordered keyword list.
///
/// Categories keep the order of the bundle and keywords keep their order
/// inside each category, so the first entry contained in a label wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    language: Language,
    text: UiText,
    entries: Vec<KeywordEntry>,
}

impl LocaleTable {
    /// Load one of the bundles compiled into the crate.
    pub fn builtin(language: Language) -> Result<Self, CardError> {
        let source = match language {
            Language::En => EN_BUNDLE,
            Language::Pl => PL_BUNDLE,
        };
        let table = Self::from_json(source)?;
        if table.language != language {
            return Err(CardError::Locale(format!(
                "bundle for {language} declares language {}",
                table.language
            )));
        }
        Ok(table)
    }

    pub fn from_json(source: &str) -> Result<Self, CardError> {
        let bundle: LocaleBundle =
            serde_json::from_str(source).map_err(|err| CardError::Locale(err.to_string()))?;

        let mut seen = Vec::with_capacity(bundle.categories.len());
        let mut entries = Vec::new();
        for category in bundle.categories {
            if seen.contains(&category.name) {
                return Err(CardError::Locale(format!(
                    "category {:?} listed twice",
                    category.name
                )));
            }
            seen.push(category.name);

            for (keyword, icon) in category.objects {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    continue;
                }
                entries.push(KeywordEntry {
                    category: category.name,
                    keyword,
                    icon,
                });
            }
        }

        Ok(Self {
            language: bundle.language,
            text: bundle.text,
            entries,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn text(&self) -> &UiText {
        &self.text
    }

    /// Category of the first keyword contained in `label`.
    pub fn classify(&self, label: &str) -> Option<Category> {
        self.find(label).map(|entry| entry.category)
    }

    /// Icon for `label`, or [`FALLBACK_ICON`] when nothing matches.
    pub fn resolve_icon(&self, label: &str) -> &str {
        self.find(label)
            .map(|entry| entry.icon.as_str())
            .unwrap_or(FALLBACK_ICON)
    }

    fn find(&self, label: &str) -> Option<&KeywordEntry> {
        let haystack = label.to_lowercase();
        self.entries
            .iter()
            .find(|entry| haystack.contains(&entry.keyword))
    }
}

/// Resolve the display icon for an event label.
pub fn resolve_icon(label: &str, locale: &LocaleTable) -> String {
    locale.resolve_icon(label).to_string()
}
