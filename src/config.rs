//! Configuration and CLI argument handling

use clap::{Parser, ValueEnum};

use crate::{
    services::CueBackend,
    state::{
        timer_config::{DEFAULT_PREPARE_SECONDS, DEFAULT_REST_MINUTES, DEFAULT_STUDY_MINUTES, DEFAULT_TOTAL_SETS},
        TimerConfig,
    },
};

/// Cue backend selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CueKind {
    /// Ring the terminal bell
    Bell,
    /// Run --cue-command for every transition
    Command,
    /// No sound, log only
    None,
}

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "study-timer")]
#[command(about = "A state-managed HTTP daemon running a prepare/study/rest interval timer")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Prepare phase length in seconds (5-60)
    #[arg(long, default_value_t = DEFAULT_PREPARE_SECONDS as i64, allow_negative_numbers = true)]
    pub prepare: i64,

    /// Study phase length in minutes (5-120)
    #[arg(long, default_value_t = DEFAULT_STUDY_MINUTES as i64, allow_negative_numbers = true)]
    pub study: i64,

    /// Rest phase length in minutes (1-30)
    #[arg(long, default_value_t = DEFAULT_REST_MINUTES as i64, allow_negative_numbers = true)]
    pub rest: i64,

    /// Number of prepare/study/rest sets (1-20)
    #[arg(long, default_value_t = DEFAULT_TOTAL_SETS as i64, allow_negative_numbers = true)]
    pub sets: i64,

    /// How phase transitions are announced
    #[arg(long, value_enum, default_value = "bell")]
    pub cue: CueKind,

    /// Command line run when --cue command is selected
    #[arg(long)]
    pub cue_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial timer configuration, clamped to the settings bounds
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::from_display(self.prepare, self.study, self.rest, self.sets)
    }

    /// Resolve the cue backend from --cue and --cue-command
    pub fn cue_backend(&self) -> Result<CueBackend, String> {
        match self.cue {
            CueKind::Bell => Ok(CueBackend::Bell),
            CueKind::None => Ok(CueBackend::Silent),
            CueKind::Command => {
                let command_line = self
                    .cue_command
                    .as_deref()
                    .ok_or_else(|| "--cue command requires --cue-command".to_string())?;
                CueBackend::command(command_line)
            }
        }
    }
}
