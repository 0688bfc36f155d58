//! Detector configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DetectError, DetectResult};

/// How `every` registrations are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodicMode {
    /// Checked only when an event arrives; a quiet stream never fires.
    #[default]
    Polling,
    /// Checked by a background thread on a fixed tick while the detector is open.
    Background,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub periodic_mode: PeriodicMode,
    /// Tick period of the background ticker, in milliseconds.
    pub background_tick_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            periodic_mode: PeriodicMode::Polling,
            background_tick_ms: 100,
        }
    }
}

impl DetectorConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> DetectResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| DetectError::config(format!("invalid detector config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> DetectResult<()> {
        if self.periodic_mode == PeriodicMode::Background && self.background_tick_ms == 0 {
            return Err(DetectError::config("background_tick_ms must be positive"));
        }
        Ok(())
    }

    /// Background tick period, clamped to at least one millisecond.
    #[must_use]
    pub fn background_tick(&self) -> Duration {
        Duration::from_millis(self.background_tick_ms.max(1))
    }
}
