//! Detail overlay state. At most one popup is open at a time.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::view::EventEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PopupState {
    open: Option<EventEntry>,
}

impl PopupState {
    /// Open the overlay for `entry`, replacing any popup already shown.
    pub fn show(&mut self, entry: EventEntry) {
        debug!("Event clicked: {}", entry.title);
        self.open = Some(entry);
    }

    pub fn dismiss(&mut self) {
        self.open = None;
    }

    pub fn current(&self) -> Option<&EventEntry> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(position: usize, title: &str) -> EventEntry {
        EventEntry {
            position,
            title: title.to_string(),
            icon: "mdi:walk".to_string(),
            time: "09:00".to_string(),
            secondary: "09:00".to_string(),
            summary: String::new(),
            key_frame: None,
            camera: None,
            alt: format!("Key frame {position}"),
        }
    }

    #[test]
    fn show_replaces_the_open_popup() {
        let mut popup = PopupState::default();
        assert!(!popup.is_open());

        popup.show(entry(1, "Person"));
        popup.show(entry(2, "Car"));

        assert_eq!(popup.current().map(|e| e.title.as_str()), Some("Car"));
    }

    #[test]
    fn dismiss_closes() {
        let mut popup = PopupState::default();
        popup.show(entry(1, "Person"));
        popup.dismiss();
        assert_eq!(popup.current(), None);

        // dismissing twice is harmless
        popup.dismiss();
        assert!(!popup.is_open());
    }
}
