use chrono::{Duration, Timelike};

use crate::classifier::config::ClassifierConfig;
use crate::models::{ActivitySignals, Status, Timestamp, UpcomingEvent};

/// Classify the current situation. Rules are evaluated in a fixed priority
/// order and the first match wins.
pub fn classify(
    signals: &ActivitySignals,
    events: &[UpcomingEvent],
    now: Timestamp,
    config: &ClassifierConfig,
) -> Status {
    if signals.focus_session_active {
        return Status::Focused;
    }

    let Some(last_input) = signals.last_input_time else {
        return Status::Observing;
    };

    if now - last_input > Duration::minutes(config.inactivity_minutes) {
        return Status::Observing;
    }

    if signals.skip_count >= config.overload_threshold
        || signals.delay_count >= config.overload_threshold
    {
        return Status::NearOverload;
    }

    let upcoming = upcoming_within(events, now, config.lookahead_hours);

    if schedule_density(upcoming.len(), config.lookahead_hours) >= config.dense_events_per_hour {
        return if signals.has_friction() {
            Status::NearOverload
        } else {
            Status::NeedsAdjust
        };
    }

    if is_late_night(now) && upcoming.len() > config.late_night_event_threshold {
        return Status::Recovery;
    }

    if upcoming.len() > config.tight_gap_min_events
        && has_tight_gap(&upcoming, config.tight_gap_minutes)
    {
        return Status::NeedsAdjust;
    }

    Status::Stable
}

/// Events starting in `[now, now + hours)`, ordered by start.
pub fn upcoming_within(
    events: &[UpcomingEvent],
    now: Timestamp,
    hours: i64,
) -> Vec<&UpcomingEvent> {
    let horizon = now + Duration::hours(hours);
    let mut upcoming: Vec<&UpcomingEvent> = events
        .iter()
        .filter(|event| event.start >= now && event.start < horizon)
        .collect();
    upcoming.sort_by_key(|event| event.start);
    upcoming
}

/// Upcoming events per hour of look-ahead.
pub fn schedule_density(upcoming: usize, hours: i64) -> f64 {
    if hours <= 0 {
        return 0.0;
    }
    upcoming as f64 / hours as f64
}

/// 22:00 through 05:59.
pub fn is_late_night(now: Timestamp) -> bool {
    let hour = now.hour();
    hour >= 22 || hour < 6
}

/// Whether any event starts less than `gap_minutes` after the previous one
/// ends. Overlaps count as tight. Expects `upcoming` sorted by start.
fn has_tight_gap(upcoming: &[&UpcomingEvent], gap_minutes: i64) -> bool {
    upcoming
        .windows(2)
        .any(|pair| pair[1].start - pair[0].end < Duration::minutes(gap_minutes))
}
