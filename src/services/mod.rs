//! External side effects module
//!
//! Cue playback is the only effect the timer reaches outside the process.

pub mod cue;

// Re-export main types
pub use cue::CueBackend;
