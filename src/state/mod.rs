//! State management module
//!
//! The study cycle state machine, its configuration and snapshot types, and
//! the shared application state handed to HTTP handlers.

pub mod mode;
pub mod timer_config;
pub mod timer_state;
pub mod snapshot;
pub mod app_state;

// Re-export main types
pub use mode::Mode;
pub use timer_config::{ConfigField, ConfigUpdate, Direction, FieldBounds, FieldUnit, TimerConfig};
pub use timer_state::{PhaseEnded, TimerState};
pub use snapshot::TimerSnapshot;
pub use app_state::{AppState, EngineCommand, EngineRequest};
