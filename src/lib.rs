//! Study Timer - A state-managed HTTP daemon running a study interval timer
//!
//! This library provides the prepare/study/rest cycle state machine, the
//! single task that ticks it, and an HTTP surface for presentation clients.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Mode, TimerConfig, TimerSnapshot, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
