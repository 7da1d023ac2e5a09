//! Timer phase enumeration

use std::fmt;
use serde::{Deserialize, Serialize};

/// The segment of the cycle the timer is currently counting down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Prepare,
    Study,
    Rest,
}

impl Mode {
    /// Human readable label used by presentation layers
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Prepare => "Prepare",
            Mode::Study => "Study",
            Mode::Rest => "Rest",
        }
    }

    /// Lowercase identifier, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Prepare => "prepare",
            Mode::Study => "study",
            Mode::Rest => "rest",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
