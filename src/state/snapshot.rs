//! Read-only view of the engine handed to presentation layers

use serde::{Deserialize, Serialize};

use super::Mode;

/// Engine state as observed between two mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub current_set: u32,
    pub total_sets: u32,
    pub remaining_seconds: u32,
    pub total_seconds_for_current_mode: u32,
    pub is_running: bool,
    pub settings_open: bool,
}

impl TimerSnapshot {
    /// Whole minutes left on the countdown
    pub fn minutes(&self) -> u32 {
        self.remaining_seconds / 60
    }

    /// Seconds past the whole minutes
    pub fn seconds(&self) -> u32 {
        self.remaining_seconds % 60
    }

    /// `MM:SS` readout
    pub fn clock_text(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds_for_current_mode.saturating_sub(self.remaining_seconds)
    }

    /// Fraction of the current phase already elapsed, for dial rendering
    pub fn progress(&self) -> f64 {
        if self.total_seconds_for_current_mode == 0 {
            return 0.0;
        }
        self.elapsed_seconds() as f64 / self.total_seconds_for_current_mode as f64
    }
}
