//! Cooldown gate between state pushes and renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Render bookkeeping owned by one card instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RenderState {
    pub last_update: Option<DateTime<Utc>>,
}

impl RenderState {
    /// Whether a push at `now` may render. Stamps `now` when it may.
    pub fn should_render(&mut self, now: DateTime<Utc>, interval_minutes: f64) -> bool {
        if let Some(last) = self.last_update {
            let elapsed_ms = now.signed_duration_since(last).num_milliseconds() as f64;
            if elapsed_ms < interval_minutes * MS_PER_MINUTE {
                return false;
            }
        }
        self.last_update = Some(now);
        true
    }
}
