//! Background tasks module
//!
//! The engine runner that owns the timer, its tick source, and the cue
//! player that consumes phase-ended events.

pub mod tick_source;
pub mod engine_runner;
pub mod cue_player;

// Re-export main types and functions
pub use tick_source::{TickSource, TICK_PERIOD};
pub use engine_runner::{engine_runner_task, EngineRunner};
pub use cue_player::cue_player_task;
