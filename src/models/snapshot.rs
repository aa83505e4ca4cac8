use serde::{Deserialize, Serialize};

use super::{Status, Timestamp, TriggerType};

/// Published after every recomputation and replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingSnapshot {
    pub id: String,
    pub sentence: String,
    pub status: Status,
    /// Index of the template the sentence was built from; feedback on this
    /// snapshot is attributed to it.
    pub template_index: usize,
    pub updated_at: Timestamp,
    pub trigger_type: TriggerType,
}
