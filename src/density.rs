use crate::models::{Density, DensitySetting};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Maps an understanding score to a verbosity tier, unless the user pinned one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DensityAdapter {
    setting: DensitySetting,
}

impl DensityAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_setting(setting: DensitySetting) -> Self {
        Self { setting }
    }

    /// The better the user already understands, the less we say. Scores are
    /// clamped to 0-100; NaN is ignored.
    pub fn update_from_understanding(&mut self, score: f64) {
        if score.is_nan() {
            log_warn!("ignoring NaN understanding score");
            return;
        }

        let auto = density_for_score(score.clamp(0.0, 100.0));
        if auto != self.setting.auto {
            log_debug!("auto density {} -> {} (score {score:.1})", self.setting.auto, auto);
        }
        self.setting.auto = auto;
    }

    pub fn set_override(&mut self, value: Option<Density>) {
        self.setting.override_value = value;
    }

    pub fn effective(&self) -> Density {
        self.setting.effective()
    }

    pub fn setting(&self) -> DensitySetting {
        self.setting
    }
}

pub fn density_for_score(score: f64) -> Density {
    if score >= 70.0 {
        Density::Minimal
    } else if score >= 40.0 {
        Density::Normal
    } else {
        Density::Detailed
    }
}
