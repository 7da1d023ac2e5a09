//! Timer state machine
//!
//! Pure and synchronous: no clocks, no channels. The engine runner in
//! `tasks::engine_runner` owns one `TimerState`, feeds it commands and ticks,
//! and drives the tick source from what it reports.
//!
//! ```text
//! Prepare -> Study -> Rest -> Prepare (set + 1)
//!                       \
//!                        -> Prepare (set 1, halted) after the final set
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ConfigUpdate, Mode, TimerConfig, TimerSnapshot};

/// Emitted once for every phase transition, including skips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEnded {
    /// The phase that just finished
    pub ended: Mode,
    /// Set the finished phase belonged to
    pub set: u32,
    pub at: DateTime<Utc>,
}

/// Configuration plus countdown state for the study cycle
#[derive(Debug, Clone)]
pub struct TimerState {
    config: TimerConfig,
    mode: Mode,
    current_set: u32,
    remaining_seconds: u32,
    running: bool,
    settings_open: bool,
}

impl TimerState {
    /// Initial state: idle at the start of set 1
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            mode: Mode::Prepare,
            current_set: 1,
            remaining_seconds: config.duration_for(Mode::Prepare),
            running: false,
            settings_open: false,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            current_set: self.current_set,
            total_sets: self.config.total_sets(),
            remaining_seconds: self.remaining_seconds,
            total_seconds_for_current_mode: self.config.duration_for(self.mode),
            is_running: self.running,
            settings_open: self.settings_open,
        }
    }

    // Commands

    /// Begin (or resume) counting down; closes the settings view
    pub fn start(&mut self) {
        self.settings_open = false;
        if !self.running {
            info!("Timer started: {} of set {}/{}", self.mode, self.current_set, self.config.total_sets());
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        if self.running {
            info!("Timer paused with {}s left in {}", self.remaining_seconds, self.mode);
            self.running = false;
        }
    }

    /// Halt and return to the start of set 1
    pub fn reset(&mut self) {
        info!("Timer reset");
        self.running = false;
        self.enter(Mode::Prepare);
        self.current_set = 1;
    }

    /// Force a phase transition regardless of the remaining time
    pub fn skip(&mut self) -> PhaseEnded {
        info!("Skipping {} of set {}", self.mode, self.current_set);
        self.advance()
    }

    /// Unified configuration change; reseeds the countdown only when idle in
    /// the mode the field belongs to. While running the countdown is left
    /// alone, so `remaining_seconds` may exceed the new phase length until
    /// the next transition.
    pub fn update_config(&mut self, update: ConfigUpdate) {
        self.config.apply(update);
        info!("Configuration {} set to {}", update.field(), update.display_value());

        if !self.running && update.field().mode() == Some(self.mode) {
            self.remaining_seconds = self.config.duration_for(self.mode);
        }
    }

    /// Open the settings view; ignored while running
    pub fn open_settings(&mut self) -> bool {
        if self.running {
            debug!("Settings view stays closed while running");
            return false;
        }
        self.settings_open = true;
        true
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    // Tick effect

    /// One wall-clock second elapsed. Never transitions by itself.
    pub fn tick(&mut self) {
        if self.running && self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            debug!("Tick: {}s left in {}", self.remaining_seconds, self.mode);
        }
    }

    /// Observe a finished countdown and transition if one is due
    pub fn settle(&mut self) -> Option<PhaseEnded> {
        if self.running && self.remaining_seconds == 0 {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Phase-transition algorithm shared by zero-crossing and skip
    fn advance(&mut self) -> PhaseEnded {
        let ended = PhaseEnded {
            ended: self.mode,
            set: self.current_set,
            at: Utc::now(),
        };

        match self.mode {
            Mode::Prepare => self.enter(Mode::Study),
            Mode::Study => self.enter(Mode::Rest),
            Mode::Rest if self.current_set < self.config.total_sets() => {
                self.current_set += 1;
                self.enter(Mode::Prepare);
            }
            Mode::Rest => {
                info!("All {} sets complete, halting", self.config.total_sets());
                self.running = false;
                self.current_set = 1;
                self.enter(Mode::Prepare);
            }
        }

        info!("Phase {} ended, now {} of set {}", ended.ended, self.mode, self.current_set);
        ended
    }

    fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.remaining_seconds = self.config.duration_for(mode);
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
