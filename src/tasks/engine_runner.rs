//! Engine runner background task
//!
//! The only place the timer state is mutated. Commands and ticks are applied
//! one at a time from a single select loop, and the runner owns the only
//! tick deadline, so a cancelled tick can never mutate state.

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};

use crate::state::{EngineCommand, EngineRequest, PhaseEnded, TimerState};
use super::TickSource;

enum Event {
    Request(EngineRequest),
    Tick,
}

/// Owns the timer state, the tick source and the publishing side of the
/// state and cue channels
#[derive(Debug)]
pub struct EngineRunner {
    timer: TimerState,
    ticks: TickSource,
    commands: mpsc::Receiver<EngineRequest>,
    state_tx: watch::Sender<TimerState>,
    cue_tx: broadcast::Sender<PhaseEnded>,
}

impl EngineRunner {
    pub fn new(
        timer: TimerState,
        commands: mpsc::Receiver<EngineRequest>,
        state_tx: watch::Sender<TimerState>,
        cue_tx: broadcast::Sender<PhaseEnded>,
    ) -> Self {
        Self {
            timer,
            ticks: TickSource::default(),
            commands,
            state_tx,
            cue_tx,
        }
    }

    /// Process commands and ticks until every command sender is dropped
    pub async fn run(mut self) {
        loop {
            let event = tokio::select! {
                request = self.commands.recv() => request.map(Event::Request),
                () = self.ticks.fired() => Some(Event::Tick),
            };

            let Some(event) = event else {
                break;
            };

            match event {
                Event::Request(request) => {
                    self.apply(request.command);
                    if request.reply.send(self.timer.clone()).is_err() {
                        debug!("Caller went away before the reply was sent");
                    }
                }
                Event::Tick => {
                    self.timer.tick();
                    self.settle(false);
                }
            }
        }

        self.ticks.cancel();
        info!("Engine runner stopped");
    }

    fn apply(&mut self, command: EngineCommand) {
        let mut rearm = false;

        match command {
            EngineCommand::Start => self.timer.start(),
            EngineCommand::Pause => self.timer.pause(),
            EngineCommand::Reset => self.timer.reset(),
            EngineCommand::Skip => {
                let ended = self.timer.skip();
                self.emit(ended);
                rearm = true;
            }
            EngineCommand::UpdateConfig(update) => self.timer.update_config(update),
            EngineCommand::NudgeConfig(field, direction) => {
                let current = self.timer.config().display_value(field);
                let target = field.nudge(current, direction);
                self.timer.update_config(field.update(target as i64));
            }
            EngineCommand::OpenSettings => {
                self.timer.open_settings();
            }
            EngineCommand::CloseSettings => self.timer.close_settings(),
        }

        self.settle(rearm);
    }

    /// Run a due transition, reconcile the tick source, then publish.
    /// `rearm` restarts the period from now; otherwise a tick that just fired
    /// is followed on its own schedule.
    fn settle(&mut self, mut rearm: bool) {
        if let Some(ended) = self.timer.settle() {
            self.emit(ended);
            // A tick still pending belongs to the phase that just ended
            rearm |= self.ticks.is_armed();
        }

        if !self.timer.is_running() {
            self.ticks.cancel();
        } else if rearm {
            self.ticks.arm();
        } else if !self.ticks.is_armed() {
            self.ticks.arm_next();
        }

        self.state_tx.send_replace(self.timer.clone());
    }

    fn emit(&self, ended: PhaseEnded) {
        if self.cue_tx.send(ended).is_err() {
            debug!("No cue listeners, phase-ended cue dropped");
        }
    }
}

/// Background task that owns the timer engine
pub async fn engine_runner_task(runner: EngineRunner) {
    info!("Starting engine runner task");
    runner.run().await;
}
