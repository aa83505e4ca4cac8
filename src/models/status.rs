use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Six-way classification of the user's current situation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Observing,
    Stable,
    Focused,
    NeedsAdjust,
    NearOverload,
    Recovery,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Observing,
        Status::Stable,
        Status::Focused,
        Status::NeedsAdjust,
        Status::NearOverload,
        Status::Recovery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Observing => "observing",
            Status::Stable => "stable",
            Status::Focused => "focused",
            Status::NeedsAdjust => "needsAdjust",
            Status::NearOverload => "nearOverload",
            Status::Recovery => "recovery",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Observing
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| anyhow!("unknown status '{value}'"))
    }
}

/// Why a recomputation ran. Recorded on snapshots, never consulted by the
/// classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    UserAction,
    TimeElapsed,
    SituationSignal,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::UserAction => "user_action",
            TriggerType::TimeElapsed => "time_elapsed",
            TriggerType::SituationSignal => "situation_signal",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_match_serde_names() {
        for status in Status::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_an_error() {
        assert!("overwhelmed".parse::<Status>().is_err());
        assert!("".parse::<Status>().is_err());
    }

    #[test]
    fn trigger_type_uses_snake_case() {
        let json = serde_json::to_string(&TriggerType::SituationSignal).unwrap();
        assert_eq!(json, "\"situation_signal\"");
    }
}
