//! Per-instance card controller: cooldown gate, feed normalization, view.

use chrono::{DateTime, TimeZone, Utc};
use log::{debug, error};

use crate::feed::{normalize, RawFeed};
use crate::locale::LocaleTable;
use crate::schedule::RenderState;
use crate::view::{build_view, CardView};
use crate::{CardConfig, CardError};

/// Outcome of one state push.
#[derive(Debug, Clone, PartialEq)]
pub enum CardUpdate {
    /// Inside the cooldown window; keep what is on screen.
    Suppressed,
    Render(CardView),
}

#[derive(Debug, Clone)]
pub struct Card {
    config: CardConfig,
    locale: LocaleTable,
    state: RenderState,
}

impl Card {
    pub fn new(config: CardConfig) -> Result<Self, CardError> {
        let locale = LocaleTable::builtin(config.language)?;
        Ok(Self {
            config,
            locale,
            state: RenderState::default(),
        })
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn locale(&self) -> &LocaleTable {
        &self.locale
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    /// Replace the configuration. The cooldown window is kept.
    pub fn reconfigure(&mut self, config: CardConfig) -> Result<(), CardError> {
        if config.language != self.locale.language() {
            self.locale = LocaleTable::builtin(config.language)?;
        }
        self.config = config;
        Ok(())
    }

    /// Handle a state push. `source` is the calendar entity's feed, `None`
    /// when the entity does not exist.
    pub fn on_state_push<Tz: TimeZone>(
        &mut self,
        source: Option<&RawFeed>,
        now: &DateTime<Tz>,
    ) -> CardUpdate {
        if !self.should_render(now) {
            return CardUpdate::Suppressed;
        }
        CardUpdate::Render(self.render(source, now))
    }

    /// Cooldown gate on its own, for hosts whose source lookup is costly.
    /// A `true` answer stamps the window; follow it with [`Card::render`].
    pub fn should_render<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let due = self
            .state
            .should_render(now.with_timezone(&Utc), self.config.refresh_interval);
        if !due {
            debug!("Push inside refresh interval, skipping render");
        }
        due
    }

    /// Build the view for a push that passed the gate.
    pub fn render<Tz: TimeZone>(&self, source: Option<&RawFeed>, now: &DateTime<Tz>) -> CardView {
        let Some(feed) = source else {
            error!("Calendar entity not found: {}", self.config.calendar_entity);
            return CardView::default();
        };

        let records = normalize(feed, self.config.number_of_events, &now.timezone());
        let view = build_view(&records, self.config.number_of_events, &self.locale, now);
        debug!(
            "Rendering {} events in {} groups",
            view.entry_count(),
            view.groups.len()
        );
        view
    }
}
