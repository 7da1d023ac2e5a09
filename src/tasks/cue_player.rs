//! Cue player background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{services::CueBackend, state::AppState};

/// Background task that turns phase-ended cues into sound.
///
/// Playback failures are logged and dropped; they never reach the engine.
pub async fn cue_player_task(state: Arc<AppState>, backend: CueBackend) {
    info!("Starting cue player task with {:?}", backend);

    let mut cue_rx = state.subscribe_cues();
    drop(state);

    loop {
        match cue_rx.recv().await {
            Ok(cue) => {
                if let Err(e) = backend.play(&cue).await {
                    warn!("Cue playback failed: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Cue player lagged, {} cues skipped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Cue channel closed, stopping cue player");
                break;
            }
        }
    }
}
