//! Audible cue backends for phase transitions

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, info};

use crate::state::PhaseEnded;

/// Terminal bell control character
const BEL: &[u8] = b"\x07";

/// How a phase-ended cue is made audible
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueBackend {
    /// Ring the terminal bell on stdout
    Bell,
    /// Run an external program, e.g. `paplay /usr/share/sounds/bell.oga`
    Command { program: String, args: Vec<String> },
    /// Log only
    Silent,
}

impl CueBackend {
    /// Build a command backend from a whitespace separated command line
    pub fn command(command_line: &str) -> Result<Self, String> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| "Cue command is empty".to_string())?;

        Ok(CueBackend::Command {
            program,
            args: parts.collect(),
        })
    }

    /// Play the cue for one transition
    pub async fn play(&self, cue: &PhaseEnded) -> Result<(), String> {
        match self {
            CueBackend::Bell => {
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(BEL)
                    .await
                    .map_err(|e| format!("Failed to ring terminal bell: {}", e))?;
                stdout
                    .flush()
                    .await
                    .map_err(|e| format!("Failed to flush terminal bell: {}", e))?;
            }
            CueBackend::Command { program, args } => {
                debug!("Running cue command {} {:?}", program, args);

                let status = Command::new(program)
                    .args(args)
                    .env("STUDY_TIMER_PHASE", cue.ended.as_str())
                    .env("STUDY_TIMER_SET", cue.set.to_string())
                    .status()
                    .await
                    .map_err(|e| format!("Failed to execute cue command {}: {}", program, e))?;

                if !status.success() {
                    return Err(format!("Cue command {} exited with {}", program, status));
                }
            }
            CueBackend::Silent => {}
        }

        info!("Cue played: {} of set {} ended", cue.ended, cue.set);
        Ok(())
    }
}
