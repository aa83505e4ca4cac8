use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use super::{Status, Timestamp};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackType {
    Helpful,
    Different,
    Skip,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Helpful => "helpful",
            FeedbackType::Different => "different",
            FeedbackType::Skip => "skip",
        }
    }

    /// Signed change applied to a template weight.
    pub fn weight_delta(&self) -> i32 {
        match self {
            FeedbackType::Helpful => 10,
            FeedbackType::Different => -5,
            FeedbackType::Skip => -3,
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "helpful" => Ok(FeedbackType::Helpful),
            "different" => Ok(FeedbackType::Different),
            "skip" => Ok(FeedbackType::Skip),
            other => Err(anyhow!("unknown feedback type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub status: Status,
    pub template_index: usize,
    pub feedback_type: FeedbackType,
    pub timestamp: Timestamp,
}

/// Cumulative feedback tallies. Never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionCounters {
    pub total_feedbacks: u64,
    pub helpful_count: u64,
    pub different_count: u64,
    pub skip_count: u64,
}

impl EvolutionCounters {
    pub fn record(&mut self, feedback_type: FeedbackType) {
        self.total_feedbacks = self.total_feedbacks.saturating_add(1);
        let counter = match feedback_type {
            FeedbackType::Helpful => &mut self.helpful_count,
            FeedbackType::Different => &mut self.different_count,
            FeedbackType::Skip => &mut self.skip_count,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Per-status tallies over the retained feedback history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackTally {
    pub helpful: u32,
    pub different: u32,
    pub skip: u32,
}

impl FeedbackTally {
    pub fn add(&mut self, feedback_type: FeedbackType) {
        match feedback_type {
            FeedbackType::Helpful => self.helpful += 1,
            FeedbackType::Different => self.different += 1,
            FeedbackType::Skip => self.skip += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.helpful + self.different + self.skip
    }
}
