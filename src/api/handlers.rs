//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::{AppState, ConfigField, Direction, EngineCommand};
use super::responses::{
    CommandResponse, ConfigResponse, ConfigValueRequest, HealthResponse, StatusResponse, TimerView,
};

type ApiResult<T> = Result<Json<T>, StatusCode>;

/// Run one engine command and wrap the resulting snapshot
async fn run_command(state: &AppState, command: EngineCommand, message: &str) -> ApiResult<CommandResponse> {
    match state.dispatch(command).await {
        Ok(timer) => {
            info!("{} endpoint called", command.action());
            Ok(Json(CommandResponse::new(message.to_string(), timer.snapshot())))
        }
        Err(e) => {
            error!("Failed to {}: {}", command.action(), e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

fn parse_field(name: &str) -> Result<ConfigField, StatusCode> {
    name.parse().map_err(|e| {
        warn!("{}", e);
        StatusCode::NOT_FOUND
    })
}

/// Handle POST /start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<CommandResponse> {
    run_command(&state, EngineCommand::Start, "Timer started").await
}

/// Handle POST /pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<CommandResponse> {
    run_command(&state, EngineCommand::Pause, "Timer paused").await
}

/// Handle POST /reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<CommandResponse> {
    run_command(&state, EngineCommand::Reset, "Timer reset to the first set").await
}

/// Handle POST /skip
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> ApiResult<CommandResponse> {
    run_command(&state, EngineCommand::Skip, "Skipped to the next phase").await
}

/// Handle POST /settings/open
pub async fn open_settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<CommandResponse> {
    match state.open_settings().await {
        Ok(timer) if timer.settings_open() => Ok(Json(CommandResponse::new(
            "Settings opened".to_string(),
            timer.snapshot(),
        ))),
        Ok(timer) => Ok(Json(CommandResponse::new(
            "Settings are locked while the timer runs".to_string(),
            timer.snapshot(),
        ))),
        Err(e) => {
            error!("Failed to open settings: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /settings/close
pub async fn close_settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<CommandResponse> {
    run_command(&state, EngineCommand::CloseSettings, "Settings closed").await
}

/// Handle GET /config
pub async fn config_handler(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse::from(state.current().config()))
}

/// Handle PUT /config/:field
pub async fn set_config_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
    Json(request): Json<ConfigValueRequest>,
) -> ApiResult<ConfigResponse> {
    let field = parse_field(&field)?;

    match state.set_config(field, request.value).await {
        Ok(timer) => Ok(Json(ConfigResponse::from(timer.config()))),
        Err(e) => {
            error!("Failed to update {}: {}", field, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn nudge_config(state: &AppState, field: &str, direction: Direction) -> ApiResult<ConfigResponse> {
    let field = parse_field(field)?;

    match state.nudge_config(field, direction).await {
        Ok(timer) => Ok(Json(ConfigResponse::from(timer.config()))),
        Err(e) => {
            error!("Failed to step {}: {}", field, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /config/:field/increment
pub async fn increment_config_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
) -> ApiResult<ConfigResponse> {
    nudge_config(&state, &field, Direction::Increment).await
}

/// Handle POST /config/:field/decrement
pub async fn decrement_config_handler(
    State(state): State<Arc<AppState>>,
    Path(field): Path<String>,
) -> ApiResult<ConfigResponse> {
    nudge_config(&state, &field, Direction::Decrement).await
}

/// Handle GET /status - Return the snapshot with server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.snapshot().into(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream snapshots and phase-ended cues
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let snapshots = stream::unfold((state.watch_state(), true), |(mut state_rx, first)| async move {
        if !first && state_rx.changed().await.is_err() {
            return None;
        }
        let view = TimerView::from(state_rx.borrow_and_update().snapshot());
        Some((Event::default().event("snapshot").json_data(view), (state_rx, false)))
    });

    let cues = stream::unfold(state.subscribe_cues(), |mut cue_rx| async move {
        loop {
            match cue_rx.recv().await {
                Ok(cue) => return Some((Event::default().event("phase-ended").json_data(cue), cue_rx)),
                Err(RecvError::Lagged(skipped)) => warn!("Event stream lagged, {} cues skipped", skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream::select(snapshots, cues)).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
