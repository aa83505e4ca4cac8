use rand::rngs::StdRng;
use uuid::Uuid;

use crate::classifier::classify;
use crate::composer::compose;
use crate::density::DensityAdapter;
use crate::learning::FeedbackLearner;
use crate::models::{ActivitySignals, BriefingSnapshot, Timestamp, TriggerType, UpcomingEvent};
use crate::settings::EngineSettings;

/// Everything the engine mutates, guarded by one lock in the controller.
pub struct EngineState {
    pub signals: ActivitySignals,
    /// Last successfully fetched calendar events; replaced wholesale.
    pub events: Vec<UpcomingEvent>,
    pub snapshot: Option<BriefingSnapshot>,
    pub learner: FeedbackLearner,
    pub density: DensityAdapter,
    pub rng: StdRng,
}

impl EngineState {
    pub fn new(rng: StdRng) -> Self {
        Self {
            signals: ActivitySignals::new(),
            events: Vec::new(),
            snapshot: None,
            learner: FeedbackLearner::new(),
            density: DensityAdapter::new(),
            rng,
        }
    }

    /// Classify, compose and publish a fresh snapshot.
    pub fn recompute(
        &mut self,
        trigger_type: TriggerType,
        now: Timestamp,
        settings: &EngineSettings,
    ) -> BriefingSnapshot {
        let status = classify(&self.signals, &self.events, now, &settings.classifier);
        let composed = compose(
            status,
            self.learner.weights().row(status),
            now,
            settings.greeting_probability,
            &mut self.rng,
        );

        let snapshot = BriefingSnapshot {
            id: Uuid::new_v4().to_string(),
            sentence: composed.text,
            status,
            template_index: composed.template_index,
            updated_at: now,
            trigger_type,
        };
        self.snapshot = Some(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::templates_for;
    use crate::models::Status;
    use chrono::{Duration, FixedOffset, TimeZone};
    use rand::SeedableRng;

    fn now() -> Timestamp {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 4, 14, 10, 0, 0)
            .unwrap()
    }

    fn nine_events(now: Timestamp) -> Vec<UpcomingEvent> {
        (0..9)
            .map(|i| {
                let start = now + Duration::minutes(10 + 25 * i);
                UpcomingEvent::new(format!("evt-{i}"), start, start + Duration::minutes(20))
            })
            .collect()
    }

    #[test]
    fn snapshot_replaces_previous() {
        let mut state = EngineState::new(StdRng::seed_from_u64(1));
        let settings = EngineSettings::default();

        let first = state.recompute(TriggerType::TimeElapsed, now(), &settings);
        assert_eq!(first.status, Status::Observing);
        assert_eq!(first.trigger_type, TriggerType::TimeElapsed);

        state.signals.record_action("open", now());
        let second = state.recompute(TriggerType::UserAction, now(), &settings);
        assert_eq!(second.status, Status::Stable);
        assert_ne!(first.id, second.id);
        assert_eq!(state.snapshot.as_ref(), Some(&second));
    }

    #[test]
    fn dense_day_scenarios() {
        let mut state = EngineState::new(StdRng::seed_from_u64(2));
        let settings = EngineSettings::default();
        state.signals.record_action("open", now() - Duration::minutes(3));
        state.events = nine_events(now());

        let calm = state.recompute(TriggerType::SituationSignal, now(), &settings);
        assert_eq!(calm.status, Status::NeedsAdjust);

        state.signals.increment_skip();
        let strained = state.recompute(TriggerType::SituationSignal, now(), &settings);
        assert_eq!(strained.status, Status::NearOverload);
    }

    #[test]
    fn sentence_comes_from_status_templates() {
        let mut state = EngineState::new(StdRng::seed_from_u64(3));
        let mut settings = EngineSettings::default();
        settings.greeting_probability = 0.0;
        state.signals.focus_session_active = true;

        let snapshot = state.recompute(TriggerType::UserAction, now(), &settings);
        assert_eq!(snapshot.status, Status::Focused);
        assert_eq!(
            snapshot.sentence,
            templates_for(Status::Focused)[snapshot.template_index]
        );
    }
}
