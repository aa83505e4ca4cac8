use std::collections::{BTreeMap, VecDeque};

use rand::Rng;
use uuid::Uuid;

use crate::learning::weights::{weighted_index, TemplateWeightTable};
use crate::models::{
    EvolutionCounters, FeedbackRecord, FeedbackTally, FeedbackType, Status, Timestamp,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

pub const FEEDBACK_HISTORY_CAPACITY: usize = 100;

/// Template indices at or beyond this are recorded but never grow the table.
pub const MAX_TEMPLATE_INDEX: usize = 64;

/// Milestones on `total_feedbacks`: below each bound the level is its
/// position plus one; at or past the last bound the level is 5.
const EVOLUTION_MILESTONES: [u64; 4] = [5, 15, 30, 50];

#[derive(Debug, Clone, Default)]
pub struct FeedbackLearner {
    weights: TemplateWeightTable,
    history: VecDeque<FeedbackRecord>,
    counters: EvolutionCounters,
}

impl FeedbackLearner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts. History beyond capacity keeps its newest
    /// entries; weights are clamped back into range.
    pub fn from_parts(
        mut weights: TemplateWeightTable,
        history: Vec<FeedbackRecord>,
        counters: EvolutionCounters,
    ) -> Self {
        weights.clamp_all();
        let skip = history.len().saturating_sub(FEEDBACK_HISTORY_CAPACITY);
        Self {
            weights,
            history: history.into_iter().skip(skip).collect(),
            counters,
        }
    }

    pub fn record_feedback(
        &mut self,
        status: Status,
        template_index: usize,
        feedback_type: FeedbackType,
        timestamp: Timestamp,
    ) -> FeedbackRecord {
        let record = FeedbackRecord {
            id: Uuid::new_v4().to_string(),
            status,
            template_index,
            feedback_type,
            timestamp,
        };

        self.history.push_back(record.clone());
        while self.history.len() > FEEDBACK_HISTORY_CAPACITY {
            self.history.pop_front();
        }

        if template_index < MAX_TEMPLATE_INDEX {
            let weight = self.weights.adjust(status, template_index, feedback_type);
            log_debug!(
                "feedback {} on {}[{}] -> weight {}",
                feedback_type,
                status,
                template_index,
                weight
            );
        } else {
            log_warn!(
                "ignoring weight update for out-of-range template index {} ({})",
                template_index,
                status
            );
        }

        self.counters.record(feedback_type);
        record
    }

    /// Roulette-wheel pick over the first `template_count` weights of
    /// `status`. Does not modify the table.
    pub fn weighted_template_index<R: Rng + ?Sized>(
        &self,
        status: Status,
        template_count: usize,
        rng: &mut R,
    ) -> usize {
        weighted_index(self.weights.row(status), template_count, rng)
    }

    pub fn evolution_level(&self) -> u8 {
        evolution_level_for(self.counters.total_feedbacks)
    }

    pub fn weights(&self) -> &TemplateWeightTable {
        &self.weights
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = &FeedbackRecord> + '_ {
        self.history.iter()
    }

    pub fn counters(&self) -> EvolutionCounters {
        self.counters
    }

    pub fn summary(&self) -> BTreeMap<Status, FeedbackTally> {
        let mut summary: BTreeMap<Status, FeedbackTally> = BTreeMap::new();
        for record in &self.history {
            summary
                .entry(record.status)
                .or_default()
                .add(record.feedback_type);
        }
        summary
    }
}

pub fn evolution_level_for(total_feedbacks: u64) -> u8 {
    EVOLUTION_MILESTONES
        .iter()
        .position(|bound| total_feedbacks < *bound)
        .map(|position| position as u8 + 1)
        .unwrap_or(EVOLUTION_MILESTONES.len() as u8 + 1)
}
