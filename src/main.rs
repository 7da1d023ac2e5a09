//! Study Timer - A state-managed HTTP daemon running a study interval timer
//!
//! This is the main entry point for the study-timer application.

use std::sync::Arc;
use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::info;

use study_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{cue_player_task, engine_runner_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_timer={},tower_http=info", config.log_level()))
        .init();

    let cue_backend = config.cue_backend().map_err(|e| anyhow!(e))?;
    let timer_config = config.timer_config();

    info!("Starting study-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, prepare={}s, study={}s, rest={}s, sets={}",
        config.host,
        config.port,
        timer_config.prepare_seconds(),
        timer_config.study_seconds(),
        timer_config.rest_seconds(),
        timer_config.total_sets(),
    );

    // Create application state and the engine that serves it
    let (state, runner) = AppState::new(config.port, config.host.clone(), timer_config);
    let state = Arc::new(state);

    tokio::spawn(engine_runner_task(runner));
    tokio::spawn(cue_player_task(Arc::clone(&state), cue_backend));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start | /pause | /reset | /skip");
    info!("  POST /settings/open | /settings/close");
    info!("  GET  /config, PUT /config/:field, POST /config/:field/increment|decrement");
    info!("  GET  /status - Current snapshot");
    info!("  GET  /events - Server-sent snapshots and cues");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
