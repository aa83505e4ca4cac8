//! Activity signals and calendar events read by the classifier.

use std::collections::VecDeque;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub type Timestamp = DateTime<FixedOffset>;

pub const RECENT_ACTIONS_CAPACITY: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySignals {
    /// `None` until the first recorded action ever.
    pub last_input_time: Option<Timestamp>,
    pub skip_count: u32,
    pub delay_count: u32,
    pub focus_session_active: bool,
    /// Most recent first, capped at `RECENT_ACTIONS_CAPACITY`.
    pub recent_actions: VecDeque<String>,
}

impl ActivitySignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_action(&mut self, tag: impl Into<String>, at: Timestamp) {
        self.last_input_time = Some(at);
        self.recent_actions.push_front(tag.into());
        self.recent_actions.truncate(RECENT_ACTIONS_CAPACITY);
    }

    pub fn increment_skip(&mut self) {
        self.skip_count = self.skip_count.saturating_add(1);
    }

    pub fn increment_delay(&mut self) {
        self.delay_count = self.delay_count.saturating_add(1);
    }

    pub fn has_friction(&self) -> bool {
        self.skip_count > 0 || self.delay_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub id: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl UpcomingEvent {
    pub fn new(id: impl Into<String>, start: Timestamp, end: Timestamp) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }
}
