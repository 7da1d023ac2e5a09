//! Timer configuration and the settings boundary
//!
//! Raw values coming from the CLI or the HTTP API are clamped here, before
//! they can reach the engine. `ConfigUpdate` can only be built through
//! `ConfigField::update`, so the engine never sees an out-of-bounds value.

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Mode;

pub const DEFAULT_PREPARE_SECONDS: u32 = 10;
pub const DEFAULT_STUDY_MINUTES: u32 = 50;
pub const DEFAULT_REST_MINUTES: u32 = 10;
pub const DEFAULT_TOTAL_SETS: u32 = 10;

/// Unit a field is edited in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldUnit {
    Seconds,
    Minutes,
    Count,
}

impl FieldUnit {
    /// Factor converting a display value into the engine's stored value
    fn scale(&self) -> u32 {
        match self {
            FieldUnit::Minutes => 60,
            FieldUnit::Seconds | FieldUnit::Count => 1,
        }
    }
}

/// Editable range of a configuration field, in display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub unit: FieldUnit,
}

/// Direction of a single settings step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increment,
    Decrement,
}

/// Selector for one configurable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    Prepare,
    Study,
    Rest,
    TotalSets,
}

impl ConfigField {
    pub const ALL: [ConfigField; 4] = [
        ConfigField::Prepare,
        ConfigField::Study,
        ConfigField::Rest,
        ConfigField::TotalSets,
    ];

    pub fn bounds(&self) -> FieldBounds {
        match self {
            ConfigField::Prepare => FieldBounds { min: 5, max: 60, step: 5, unit: FieldUnit::Seconds },
            ConfigField::Study => FieldBounds { min: 5, max: 120, step: 5, unit: FieldUnit::Minutes },
            ConfigField::Rest => FieldBounds { min: 1, max: 30, step: 1, unit: FieldUnit::Minutes },
            ConfigField::TotalSets => FieldBounds { min: 1, max: 20, step: 1, unit: FieldUnit::Count },
        }
    }

    /// The mode whose countdown this field seeds, if any
    pub fn mode(&self) -> Option<Mode> {
        match self {
            ConfigField::Prepare => Some(Mode::Prepare),
            ConfigField::Study => Some(Mode::Study),
            ConfigField::Rest => Some(Mode::Rest),
            ConfigField::TotalSets => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigField::Prepare => "prepare",
            ConfigField::Study => "study",
            ConfigField::Rest => "rest",
            ConfigField::TotalSets => "sets",
        }
    }

    /// Clamp a display-unit value into this field's range
    pub fn clamp(&self, value: i64) -> u32 {
        let bounds = self.bounds();
        value.clamp(bounds.min as i64, bounds.max as i64) as u32
    }

    /// One `+`/`-` step from `current`, clamped
    pub fn nudge(&self, current: u32, direction: Direction) -> u32 {
        let step = self.bounds().step as i64;
        let target = match direction {
            Direction::Increment => current as i64 + step,
            Direction::Decrement => current as i64 - step,
        };
        self.clamp(target)
    }

    /// Build a bounds-checked update from a display-unit value
    pub fn update(self, value: i64) -> ConfigUpdate {
        let clamped = self.clamp(value);
        if clamped as i64 != value {
            warn!("Clamped {} from {} to {}", self, value, clamped);
        }
        ConfigUpdate {
            field: self,
            display_value: clamped,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prepare" => Ok(ConfigField::Prepare),
            "study" => Ok(ConfigField::Study),
            "rest" => Ok(ConfigField::Rest),
            "sets" | "totalSets" | "total_sets" => Ok(ConfigField::TotalSets),
            other => Err(format!("Unknown configuration field: {}", other)),
        }
    }
}

/// An in-bounds configuration change, ready to hand to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigUpdate {
    field: ConfigField,
    display_value: u32,
}

impl ConfigUpdate {
    pub fn field(&self) -> ConfigField {
        self.field
    }

    pub fn display_value(&self) -> u32 {
        self.display_value
    }

    /// Value as the engine stores it (seconds for durations)
    pub fn engine_value(&self) -> u32 {
        self.display_value * self.field.bounds().unit.scale()
    }
}

/// Durations (seconds) and set count driving the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    prepare_seconds: u32,
    study_seconds: u32,
    rest_seconds: u32,
    total_sets: u32,
}

impl TimerConfig {
    /// Build a configuration from display-unit values, clamping each one
    pub fn from_display(prepare_seconds: i64, study_minutes: i64, rest_minutes: i64, total_sets: i64) -> Self {
        let mut config = Self::default();
        config.apply(ConfigField::Prepare.update(prepare_seconds));
        config.apply(ConfigField::Study.update(study_minutes));
        config.apply(ConfigField::Rest.update(rest_minutes));
        config.apply(ConfigField::TotalSets.update(total_sets));
        config
    }

    pub fn prepare_seconds(&self) -> u32 {
        self.prepare_seconds
    }

    pub fn study_seconds(&self) -> u32 {
        self.study_seconds
    }

    pub fn rest_seconds(&self) -> u32 {
        self.rest_seconds
    }

    pub fn total_sets(&self) -> u32 {
        self.total_sets
    }

    /// Full countdown length for a mode, always positive
    pub fn duration_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Prepare => self.prepare_seconds,
            Mode::Study => self.study_seconds,
            Mode::Rest => self.rest_seconds,
        }
    }

    /// Stored value of a field converted back into display units
    pub fn display_value(&self, field: ConfigField) -> u32 {
        let scale = field.bounds().unit.scale();
        match field {
            ConfigField::Prepare => self.prepare_seconds / scale,
            ConfigField::Study => self.study_seconds / scale,
            ConfigField::Rest => self.rest_seconds / scale,
            ConfigField::TotalSets => self.total_sets,
        }
    }

    pub fn apply(&mut self, update: ConfigUpdate) {
        let value = update.engine_value();
        match update.field() {
            ConfigField::Prepare => self.prepare_seconds = value,
            ConfigField::Study => self.study_seconds = value,
            ConfigField::Rest => self.rest_seconds = value,
            ConfigField::TotalSets => self.total_sets = value,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            prepare_seconds: DEFAULT_PREPARE_SECONDS,
            study_seconds: DEFAULT_STUDY_MINUTES * 60,
            rest_seconds: DEFAULT_REST_MINUTES * 60,
            total_sets: DEFAULT_TOTAL_SETS,
        }
    }
}
