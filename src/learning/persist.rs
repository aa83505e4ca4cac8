//! Serialization of learned state to and from a `StateStore`.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::StateStore;
use crate::learning::{FeedbackLearner, TemplateWeightTable};
use crate::models::{DensitySetting, EvolutionCounters, FeedbackRecord};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const WEIGHTS_KEY: &str = "template_weights";
pub const HISTORY_KEY: &str = "feedback_history";
pub const COUNTERS_KEY: &str = "evolution_counters";
pub const DENSITY_KEY: &str = "density_setting";

/// Key/value pairs ready to be written, produced while the engine lock is
/// held and written after it is released.
pub type PendingWrites = Vec<(&'static str, String)>;

pub fn encode_learner(learner: &FeedbackLearner) -> Result<PendingWrites> {
    let history: Vec<&FeedbackRecord> = learner.history().collect();
    Ok(vec![
        (WEIGHTS_KEY, encode(learner.weights())?),
        (HISTORY_KEY, encode(&history)?),
        (COUNTERS_KEY, encode(&learner.counters())?),
    ])
}

pub fn encode_density(setting: &DensitySetting) -> Result<PendingWrites> {
    Ok(vec![(DENSITY_KEY, encode(setting)?)])
}

pub async fn write_all(store: &dyn StateStore, writes: PendingWrites) -> Result<()> {
    for (key, value) in writes {
        store
            .put(key, value)
            .await
            .with_context(|| format!("failed to persist {key}"))?;
    }
    Ok(())
}

/// Load everything the engine persists. Keys that are missing or fail to
/// load fall back to defaults individually.
pub async fn load_all(store: &dyn StateStore) -> (FeedbackLearner, DensitySetting) {
    let weights: TemplateWeightTable = load_or_default(store, WEIGHTS_KEY).await;
    let history: Vec<FeedbackRecord> = load_or_default(store, HISTORY_KEY).await;
    let counters: EvolutionCounters = load_or_default(store, COUNTERS_KEY).await;
    let density: DensitySetting = load_or_default(store, DENSITY_KEY).await;

    log_info!(
        "restored learning state: {} feedback records, {} total feedbacks",
        history.len(),
        counters.total_feedbacks
    );

    (FeedbackLearner::from_parts(weights, history, counters), density)
}

async fn load_or_default<T: DeserializeOwned + Default>(store: &dyn StateStore, key: &str) -> T {
    match load_key(store, key).await {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            log_warn!("failed to load {key}, using defaults: {err:?}");
            T::default()
        }
    }
}

async fn load_key<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).with_context(|| format!("invalid JSON stored under {key}"))?;
    Ok(Some(value))
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("failed to serialize learning state")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Density, FeedbackType, Status};
    use chrono::{FixedOffset, TimeZone};

    #[tokio::test]
    async fn round_trips_through_store() {
        let store = MemoryStore::new();
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 2, 2, 9, 0, 0)
            .unwrap();

        let mut learner = FeedbackLearner::new();
        learner.record_feedback(Status::Stable, 1, FeedbackType::Helpful, now);
        learner.record_feedback(Status::Focused, 0, FeedbackType::Skip, now);
        let density = DensitySetting {
            auto: Density::Detailed,
            override_value: Some(Density::Minimal),
        };

        write_all(&store, encode_learner(&learner).unwrap()).await.unwrap();
        write_all(&store, encode_density(&density).unwrap()).await.unwrap();

        let (restored, restored_density) = load_all(&store).await;
        assert_eq!(restored.weights(), learner.weights());
        assert_eq!(restored.counters(), learner.counters());
        assert_eq!(restored.history().len(), 2);
        assert_eq!(restored_density, density);
    }

    #[tokio::test]
    async fn corrupt_key_falls_back_alone() {
        let store = MemoryStore::new();
        store.put(WEIGHTS_KEY, "not json".to_string()).await.unwrap();
        store
            .put(COUNTERS_KEY, r#"{"totalFeedbacks":7,"helpfulCount":7,"differentCount":0,"skipCount":0}"#.to_string())
            .await
            .unwrap();

        let (learner, density) = load_all(&store).await;
        assert!(learner.weights().row(Status::Stable).is_empty());
        assert_eq!(learner.counters().total_feedbacks, 7);
        assert_eq!(learner.evolution_level(), 2);
        assert_eq!(density, DensitySetting::default());
    }
}
