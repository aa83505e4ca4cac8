use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierConfig;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 45 * 60;
const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub refresh_interval_secs: u64,
    /// Calendar fetches running longer than this are abandoned.
    pub refresh_timeout_secs: u64,
    pub greeting_probability: f64,
    pub classifier: ClassifierConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            refresh_timeout_secs: DEFAULT_REFRESH_TIMEOUT_SECS,
            greeting_probability: 0.5,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl EngineSettings {
    /// Read settings from a JSON file. A missing file yields defaults; a file
    /// that does not parse is reported and replaced by defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = match serde_json::from_str::<Self>(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                log_warn!("ignoring malformed settings at {}: {err}", path.display());
                Self::default()
            }
        };

        Ok(settings.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs.max(1))
    }

    fn sanitized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.greeting_probability) {
            log_warn!(
                "greeting_probability {} out of range, using 0.5",
                self.greeting_probability
            );
            self.greeting_probability = 0.5;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EngineSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.refresh_interval(), Duration::from_secs(2700));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "refresh_interval_secs": 600, "classifier": { "inactivity_minutes": 30 } }"#,
        )
        .unwrap();

        let settings = EngineSettings::load(&path).unwrap();
        assert_eq!(settings.refresh_interval_secs, 600);
        assert_eq!(settings.classifier.inactivity_minutes, 30);
        assert_eq!(settings.classifier.overload_threshold, 3);
        assert_eq!(settings.greeting_probability, 0.5);
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(EngineSettings::load(&path).unwrap(), EngineSettings::default());
    }

    #[test]
    fn out_of_range_probability_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "greeting_probability": 3.0 }"#).unwrap();
        assert_eq!(EngineSettings::load(&path).unwrap().greeting_probability, 0.5);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = EngineSettings::default();
        settings.refresh_timeout_secs = 5;
        settings.classifier.tight_gap_minutes = 10;
        settings.save(&path).unwrap();

        assert_eq!(EngineSettings::load(&path).unwrap(), settings);
    }
}
