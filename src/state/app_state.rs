//! Main application state management

use std::{
    sync::Mutex,
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, warn};

use super::{ConfigField, ConfigUpdate, Direction, PhaseEnded, TimerConfig, TimerSnapshot, TimerState};
use crate::tasks::EngineRunner;

/// Capacity of the command queue feeding the engine runner
const COMMAND_QUEUE: usize = 32;
/// Cues kept for slow subscribers before they start lagging
const CUE_BACKLOG: usize = 16;

/// A mutation the engine runner applies on behalf of a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Start,
    Pause,
    Reset,
    Skip,
    UpdateConfig(ConfigUpdate),
    NudgeConfig(ConfigField, Direction),
    OpenSettings,
    CloseSettings,
}

impl EngineCommand {
    /// Short action name used for last-action tracking
    pub fn action(&self) -> &'static str {
        match self {
            EngineCommand::Start => "start",
            EngineCommand::Pause => "pause",
            EngineCommand::Reset => "reset",
            EngineCommand::Skip => "skip",
            EngineCommand::UpdateConfig(_) => "update-config",
            EngineCommand::NudgeConfig(_, Direction::Increment) => "increment-config",
            EngineCommand::NudgeConfig(_, Direction::Decrement) => "decrement-config",
            EngineCommand::OpenSettings => "open-settings",
            EngineCommand::CloseSettings => "close-settings",
        }
    }
}

/// Command plus the channel the resulting state is returned on
#[derive(Debug)]
pub struct EngineRequest {
    pub command: EngineCommand,
    pub reply: oneshot::Sender<TimerState>,
}

/// Shared state handed to HTTP handlers and background tasks.
///
/// The timer itself lives in the engine runner task; this only holds the
/// channels to reach it plus server metadata.
#[derive(Debug)]
pub struct AppState {
    /// Queue of commands for the engine runner
    commands: mpsc::Sender<EngineRequest>,
    /// Latest fully applied engine state
    state_rx: watch::Receiver<TimerState>,
    /// Phase-ended cues, fire-and-forget
    cue_tx: broadcast::Sender<PhaseEnded>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the shared state and the runner that must be spawned to serve it
    pub fn new(port: u16, host: String, config: TimerConfig) -> (Self, EngineRunner) {
        let timer = TimerState::new(config);
        let (commands, commands_rx) = mpsc::channel(COMMAND_QUEUE);
        let (state_tx, state_rx) = watch::channel(timer.clone());
        let (cue_tx, _) = broadcast::channel(CUE_BACKLOG);

        let runner = EngineRunner::new(timer, commands_rx, state_tx, cue_tx.clone());
        let state = Self {
            commands,
            state_rx,
            cue_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        };

        (state, runner)
    }

    /// Send a command to the engine runner and wait for the resulting state
    pub async fn dispatch(&self, command: EngineCommand) -> Result<TimerState, String> {
        let (reply, reply_rx) = oneshot::channel();
        self.commands
            .send(EngineRequest { command, reply })
            .await
            .map_err(|_| "Timer engine is not running".to_string())?;

        let timer = reply_rx
            .await
            .map_err(|e| format!("Timer engine dropped the reply: {}", e))?;

        debug!("Command {} applied", command.action());

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(command.action().to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(timer)
    }

    pub async fn start(&self) -> Result<TimerState, String> {
        self.dispatch(EngineCommand::Start).await
    }

    pub async fn pause(&self) -> Result<TimerState, String> {
        self.dispatch(EngineCommand::Pause).await
    }

    pub async fn reset(&self) -> Result<TimerState, String> {
        self.dispatch(EngineCommand::Reset).await
    }

    pub async fn skip(&self) -> Result<TimerState, String> {
        self.dispatch(EngineCommand::Skip).await
    }

    /// Clamp a display-unit value for `field` and apply it
    pub async fn set_config(&self, field: ConfigField, value: i64) -> Result<TimerState, String> {
        self.dispatch(EngineCommand::UpdateConfig(field.update(value))).await
    }

    /// Move `field` one step up or down
    pub async fn nudge_config(&self, field: ConfigField, direction: Direction) -> Result<TimerState, String> {
        self.dispatch(EngineCommand::NudgeConfig(field, direction)).await
    }

    pub async fn open_settings(&self) -> Result<TimerState, String> {
        let timer = self.dispatch(EngineCommand::OpenSettings).await?;
        if !timer.settings_open() {
            warn!("Settings view cannot be opened while the timer is running");
        }
        Ok(timer)
    }

    pub async fn close_settings(&self) -> Result<TimerState, String> {
        self.dispatch(EngineCommand::CloseSettings).await
    }

    /// Latest engine state, without waiting on the runner
    pub fn current(&self) -> TimerState {
        self.state_rx.borrow().clone()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.state_rx.borrow().snapshot()
    }

    /// Receiver notified after every applied command or tick
    pub fn watch_state(&self) -> watch::Receiver<TimerState> {
        self.state_rx.clone()
    }

    /// Receiver for phase-ended cues
    pub fn subscribe_cues(&self) -> broadcast::Receiver<PhaseEnded> {
        self.cue_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
