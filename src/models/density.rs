use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Verbosity tier for generated messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Density {
    Minimal,
    Normal,
    Detailed,
}

impl Density {
    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Minimal => "minimal",
            Density::Normal => "normal",
            Density::Detailed => "detailed",
        }
    }
}

impl Default for Density {
    fn default() -> Self {
        Density::Normal
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Density {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "minimal" => Ok(Density::Minimal),
            "normal" => Ok(Density::Normal),
            "detailed" => Ok(Density::Detailed),
            other => Err(anyhow!("unknown density '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensitySetting {
    pub auto: Density,
    #[serde(rename = "override")]
    pub override_value: Option<Density>,
}

impl DensitySetting {
    pub fn effective(&self) -> Density {
        self.override_value.unwrap_or(self.auto)
    }
}
