use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::db::StateStore;
use crate::density::DensityAdapter;
use crate::learning::persist::{self, PendingWrites};
use crate::models::{
    ActivitySignals, BriefingSnapshot, Density, DensitySetting, EvolutionCounters,
    FeedbackRecord, FeedbackTally, FeedbackType, Status, Timestamp, TriggerType,
};
use crate::settings::EngineSettings;
use crate::utils::describe_elapsed;

use super::{CalendarProvider, Clock, EngineState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

struct EngineCore {
    state: Mutex<EngineState>,
    /// Taken before the state lock is released and held through the store
    /// writes, so encodings reach the store in the order they were made.
    write_gate: Mutex<()>,
    provider: Arc<dyn CalendarProvider>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Ticker {
    fn shutdown(&self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Owns briefing state and decides when it is recomputed: on user actions,
/// on a periodic timer, and on externally detected situations.
#[derive(Clone)]
pub struct BriefingEngine {
    core: Arc<EngineCore>,
    ticker: Arc<Mutex<Option<Ticker>>>,
}

impl BriefingEngine {
    pub fn new(
        provider: Arc<dyn CalendarProvider>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self::with_rng(provider, store, clock, settings, StdRng::from_entropy())
    }

    /// Same as `new` but with a reproducible template and greeting sequence.
    pub fn with_seed(
        provider: Arc<dyn CalendarProvider>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
        seed: u64,
    ) -> Self {
        Self::with_rng(provider, store, clock, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        provider: Arc<dyn CalendarProvider>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
        rng: StdRng,
    ) -> Self {
        Self {
            core: Arc::new(EngineCore {
                state: Mutex::new(EngineState::new(rng)),
                write_gate: Mutex::new(()),
                provider,
                store,
                clock,
                settings,
            }),
            ticker: Arc::new(Mutex::new(None)),
        }
    }

    /// Load learned weights, feedback history, counters and density from the
    /// store. Anything that cannot be read stays at its default.
    pub async fn restore(&self) {
        let (learner, density) = persist::load_all(self.core.store.as_ref()).await;
        let mut state = self.core.state.lock().await;
        state.learner = learner;
        state.density = DensityAdapter::from_setting(density);
    }

    /// Refresh events, recompute, then arm the periodic timer. Calling it
    /// again replaces the running timer. The timer lock is only taken once
    /// the initial refresh is done, so `stop` never waits on the calendar.
    pub async fn start(&self) {
        self.core.refresh_events().await;
        self.core.recompute(TriggerType::TimeElapsed, None).await;

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(refresh_loop(self.core.clone(), cancel_token.clone()));
        let previous = self.ticker.lock().await.replace(Ticker {
            handle,
            cancel_token,
        });
        if let Some(previous) = previous {
            previous.shutdown();
            log_debug!("replaced running briefing timer");
        }

        log_info!(
            "briefing timer armed every {}s",
            self.core.settings.refresh_interval().as_secs()
        );
    }

    /// Disarm the timer. Once this returns no timer-driven recompute runs,
    /// including one that was already due.
    pub async fn stop(&self) {
        let Some(ticker) = self.ticker.lock().await.take() else {
            return;
        };
        ticker.shutdown();

        // A tick that already holds the state lock finishes before we return;
        // later ticks see the cancelled token under the lock and bail.
        drop(self.core.state.lock().await);
        log_info!("briefing timer stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.ticker.lock().await.is_some()
    }

    pub async fn record_action(&self, tag: &str) -> BriefingSnapshot {
        self.core
            .update(TriggerType::UserAction, |state, now| {
                state.signals.record_action(tag, now);
            })
            .await
    }

    pub async fn increment_skip(&self) {
        let mut state = self.core.state.lock().await;
        state.signals.increment_skip();
        log_debug!("skip count now {}", state.signals.skip_count);
    }

    pub async fn increment_delay(&self) {
        let mut state = self.core.state.lock().await;
        state.signals.increment_delay();
        log_debug!("delay count now {}", state.signals.delay_count);
    }

    pub async fn set_focus_session(&self, active: bool) -> BriefingSnapshot {
        self.core
            .update(TriggerType::UserAction, |state, _| {
                state.signals.focus_session_active = active;
            })
            .await
    }

    /// Recompute in response to an externally detected condition. The reason
    /// is only logged.
    pub async fn signal_situation(&self, reason: &str) -> BriefingSnapshot {
        log_info!("situation signal: {reason}");
        self.core.update(TriggerType::SituationSignal, |_, _| {}).await
    }

    pub async fn record_feedback(
        &self,
        status: Status,
        template_index: usize,
        feedback_type: FeedbackType,
    ) -> FeedbackRecord {
        let now = self.core.clock.now();
        self.core
            .mutate_and_persist(|state| {
                let record = state
                    .learner
                    .record_feedback(status, template_index, feedback_type, now);
                (record, persist::encode_learner(&state.learner))
            })
            .await
    }

    /// Attribute feedback to whatever sentence is currently shown.
    pub async fn record_feedback_on_current(
        &self,
        feedback_type: FeedbackType,
    ) -> Option<FeedbackRecord> {
        let current = self.snapshot().await?;
        Some(
            self.record_feedback(current.status, current.template_index, feedback_type)
                .await,
        )
    }

    pub async fn weighted_template_index(&self, status: Status, template_count: usize) -> usize {
        let mut state = self.core.state.lock().await;
        let EngineState { learner, rng, .. } = &mut *state;
        learner.weighted_template_index(status, template_count, rng)
    }

    pub async fn update_density_from_understanding(&self, score: f64) {
        self.core
            .mutate_and_persist(|state| {
                state.density.update_from_understanding(score);
                ((), persist::encode_density(&state.density.setting()))
            })
            .await
    }

    pub async fn set_density_override(&self, value: Option<Density>) {
        self.core
            .mutate_and_persist(|state| {
                state.density.set_override(value);
                ((), persist::encode_density(&state.density.setting()))
            })
            .await
    }

    pub async fn effective_density(&self) -> Density {
        self.core.state.lock().await.density.effective()
    }

    pub async fn density_setting(&self) -> DensitySetting {
        self.core.state.lock().await.density.setting()
    }

    pub async fn evolution_level(&self) -> u8 {
        self.core.state.lock().await.learner.evolution_level()
    }

    pub async fn evolution_counters(&self) -> EvolutionCounters {
        self.core.state.lock().await.learner.counters()
    }

    pub async fn snapshot(&self) -> Option<BriefingSnapshot> {
        self.core.state.lock().await.snapshot.clone()
    }

    pub async fn time_since_last_update(&self) -> String {
        let updated_at = self
            .core
            .state
            .lock()
            .await
            .snapshot
            .as_ref()
            .map(|snapshot| snapshot.updated_at);
        describe_elapsed(updated_at, self.core.clock.now())
    }

    pub async fn signals(&self) -> ActivitySignals {
        self.core.state.lock().await.signals.clone()
    }

    pub async fn recent_actions(&self) -> Vec<String> {
        self.core
            .state
            .lock()
            .await
            .signals
            .recent_actions
            .iter()
            .cloned()
            .collect()
    }

    pub async fn feedback_history(&self) -> Vec<FeedbackRecord> {
        self.core.state.lock().await.learner.history().cloned().collect()
    }

    pub async fn feedback_summary(&self) -> BTreeMap<Status, FeedbackTally> {
        self.core.state.lock().await.learner.summary()
    }
}

impl EngineCore {
    async fn update<F>(&self, trigger_type: TriggerType, mutate: F) -> BriefingSnapshot
    where
        F: FnOnce(&mut EngineState, Timestamp),
    {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        mutate(&mut *state, now);
        let snapshot = state.recompute(trigger_type, now, &self.settings);
        log_recompute(&snapshot);
        snapshot
    }

    /// Recompute unless `cancel_token` has fired. The check happens under the
    /// state lock so it cannot race with `stop`.
    async fn recompute(
        &self,
        trigger_type: TriggerType,
        cancel_token: Option<&CancellationToken>,
    ) -> Option<BriefingSnapshot> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if cancel_token.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }
        let snapshot = state.recompute(trigger_type, now, &self.settings);
        log_recompute(&snapshot);
        Some(snapshot)
    }

    /// Replace the cached events with a fresh fetch. On failure or timeout the
    /// previous list stays in place.
    async fn refresh_events(&self) {
        let timeout = self.settings.refresh_timeout();
        match time::timeout(timeout, self.provider.fetch_upcoming_events()).await {
            Ok(Ok(mut events)) => {
                events.sort_by_key(|event| event.start);
                let count = events.len();
                self.state.lock().await.events = events;
                log_debug!("calendar refreshed: {count} events cached");
            }
            Ok(Err(err)) => {
                log_warn!("calendar refresh failed, keeping cached events: {err:?}");
            }
            Err(_) => {
                log_warn!(
                    "calendar refresh timed out after {}s, keeping cached events",
                    timeout.as_secs()
                );
            }
        }
    }

    /// Apply `mutate` under the state lock and write what it encodes. The
    /// write gate is acquired before the state lock is released, so a later
    /// mutation can never have its writes overtaken by an earlier one.
    async fn mutate_and_persist<T, F>(&self, mutate: F) -> T
    where
        F: FnOnce(&mut EngineState) -> (T, Result<PendingWrites>),
    {
        let (value, writes, _write_guard) = {
            let mut state = self.state.lock().await;
            let (value, writes) = mutate(&mut *state);
            (value, writes, self.write_gate.lock().await)
        };
        self.persist(writes).await;
        value
    }

    async fn persist(&self, writes: Result<PendingWrites>) {
        let result = match writes {
            Ok(writes) => persist::write_all(self.store.as_ref(), writes).await,
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            log_error!("failed to persist learning state, continuing in memory: {err:?}");
        }
    }
}

async fn refresh_loop(core: Arc<EngineCore>, cancel_token: CancellationToken) {
    let period = core.settings.refresh_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                core.refresh_events().await;
                core.recompute(TriggerType::TimeElapsed, Some(&cancel_token)).await;
            }
            _ = cancel_token.cancelled() => {
                log_debug!("briefing refresh loop shutting down");
                break;
            }
        }
    }
}

fn log_recompute(snapshot: &BriefingSnapshot) {
    log_info!(
        "briefing recomputed ({}): {} template {}",
        snapshot.trigger_type,
        snapshot.status,
        snapshot.template_index
    );
}
