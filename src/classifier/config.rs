use serde::{Deserialize, Serialize};

/// Thresholds for the status rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Idle time after which the user is treated as away again
    pub inactivity_minutes: i64,

    /// Skip or delay count at which the user is considered overloaded
    pub overload_threshold: u32,

    /// Width of the look-ahead window for upcoming events
    pub lookahead_hours: i64,

    /// Events per hour in the look-ahead window that count as a dense schedule
    pub dense_events_per_hour: f64,

    /// Late-night recovery fires when more than this many events are upcoming
    pub late_night_event_threshold: usize,

    /// Gap between back-to-back events below which the schedule is tight
    pub tight_gap_minutes: i64,

    /// Tight gaps only matter with more than this many upcoming events
    pub tight_gap_min_events: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            inactivity_minutes: 120,
            overload_threshold: 3,
            lookahead_hours: 4,
            dense_events_per_hour: 2.0,
            late_night_event_threshold: 4,
            tight_gap_minutes: 15,
            tight_gap_min_events: 2,
        }
    }
}
