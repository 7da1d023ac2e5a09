//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ConfigField, FieldUnit, TimerConfig, TimerSnapshot};

/// Snapshot plus the values a readout or dial derives from it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub snapshot: TimerSnapshot,
    pub mode_label: String,
    pub clock: String,
    pub progress: f64,
}

impl From<TimerSnapshot> for TimerView {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            mode_label: snapshot.mode.label().to_string(),
            clock: snapshot.clock_text(),
            progress: snapshot.progress(),
            snapshot,
        }
    }
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl CommandResponse {
    /// Create a response whose status mirrors the run flag
    pub fn new(message: String, snapshot: TimerSnapshot) -> Self {
        let status = if snapshot.is_running { "running" } else { "paused" };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: snapshot.into(),
        }
    }
}

/// One configurable value with its editing range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFieldView {
    pub field: String,
    pub value: u32,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub unit: FieldUnit,
}

/// Current configuration in display units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub fields: Vec<ConfigFieldView>,
}

impl From<&TimerConfig> for ConfigResponse {
    fn from(config: &TimerConfig) -> Self {
        let fields = ConfigField::ALL
            .iter()
            .map(|field| {
                let bounds = field.bounds();
                ConfigFieldView {
                    field: field.name().to_string(),
                    value: config.display_value(*field),
                    min: bounds.min,
                    max: bounds.max,
                    step: bounds.step,
                    unit: bounds.unit,
                }
            })
            .collect();

        Self { fields }
    }
}

/// Body of PUT /config/:field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValueRequest {
    pub value: i64,
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
