use std::{fmt::Debug, sync::Arc, time::Duration};
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::stream::{Stream, StreamExt};
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

use study_timer::{
    api::create_router,
    state::{AppState, TimerConfig},
    tasks::engine_runner_task,
};

fn app() -> Router {
    let (state, runner) = AppState::new(20554, "127.0.0.1".to_string(), TimerConfig::default());
    tokio::spawn(engine_runner_task(runner));
    create_router(Arc::new(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn config_value(config: &Value, field: &str) -> u64 {
    config["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["field"] == field)
        .unwrap()["value"]
        .as_u64()
        .unwrap()
}

async fn next_frame<S, E>(body: &mut S) -> String
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Debug,
{
    let chunk = timeout(Duration::from_secs(5), body.next())
        .await
        .expect("event within five seconds")
        .expect("event stream still open")
        .unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_exposes_the_initial_snapshot() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    let timer = &body["timer"];
    assert_eq!(timer["mode"], "prepare");
    assert_eq!(timer["currentSet"], 1);
    assert_eq!(timer["totalSets"], 10);
    assert_eq!(timer["remainingSeconds"], 10);
    assert_eq!(timer["totalSecondsForCurrentMode"], 10);
    assert_eq!(timer["isRunning"], false);
    assert_eq!(timer["clock"], "00:10");
    assert_eq!(timer["progress"], 0.0);
    assert_eq!(body["port"], 20554);
    assert!(body["last_action"].is_null());
}

#[tokio::test]
async fn start_and_pause_toggle_the_run_flag() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["isRunning"], true);

    let (_, body) = send(&app, Method::POST, "/pause", None).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["isRunning"], false);

    let (_, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "pause");
}

#[tokio::test]
async fn skip_moves_to_study() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/skip", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["mode"], "study");
    assert_eq!(body["timer"]["modeLabel"], "Study");
    assert_eq!(body["timer"]["remainingSeconds"], 3000);
    assert_eq!(body["timer"]["clock"], "50:00");
}

#[tokio::test]
async fn settings_view_is_locked_while_running() {
    let app = app();

    let (_, body) = send(&app, Method::POST, "/settings/open", None).await;
    assert_eq!(body["timer"]["settingsOpen"], true);

    let (_, body) = send(&app, Method::POST, "/start", None).await;
    assert_eq!(body["timer"]["settingsOpen"], false);

    let (status, body) = send(&app, Method::POST, "/settings/open", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["settingsOpen"], false);

    send(&app, Method::POST, "/pause", None).await;
    let (_, body) = send(&app, Method::POST, "/settings/open", None).await;
    assert_eq!(body["timer"]["settingsOpen"], true);

    let (_, body) = send(&app, Method::POST, "/settings/close", None).await;
    assert_eq!(body["timer"]["settingsOpen"], false);
}

#[tokio::test]
async fn config_lists_fields_in_display_units() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(config_value(&body, "prepare"), 10);
    assert_eq!(config_value(&body, "study"), 50);
    assert_eq!(config_value(&body, "rest"), 10);
    assert_eq!(config_value(&body, "sets"), 10);

    let study = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["field"] == "study")
        .unwrap();
    assert_eq!(study["min"], 5);
    assert_eq!(study["max"], 120);
    assert_eq!(study["step"], 5);
    assert_eq!(study["unit"], "minutes");
}

#[tokio::test]
async fn put_config_clamps_and_reseeds() {
    let app = app();

    let (status, body) = send(&app, Method::PUT, "/config/prepare", Some(json!({ "value": 90 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(config_value(&body, "prepare"), 60);

    let (_, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(body["timer"]["remainingSeconds"], 60);
}

#[tokio::test]
async fn increment_and_decrement_step_a_field() {
    let app = app();

    let (_, body) = send(&app, Method::POST, "/config/study/increment", None).await;
    assert_eq!(config_value(&body, "study"), 55);

    let (_, body) = send(&app, Method::POST, "/config/sets/decrement", None).await;
    assert_eq!(config_value(&body, "sets"), 9);

    let (_, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(body["timer"]["totalSets"], 9);
    assert_eq!(body["timer"]["remainingSeconds"], 10);
}

#[tokio::test]
async fn unknown_field_is_not_found() {
    let app = app();
    let (status, _) = send(&app, Method::PUT, "/config/lunch", Some(json!({ "value": 5 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/config/lunch/increment", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn commands_fail_when_the_engine_is_gone() {
    let (state, runner) = AppState::new(20554, "127.0.0.1".to_string(), TimerConfig::default());
    drop(runner);
    let app = create_router(Arc::new(state));

    let (status, _) = send(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn events_stream_snapshots_and_phase_ends() {
    let app = app();
    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    let mut body = Box::pin(response.into_body().into_data_stream());

    let first = next_frame(&mut body).await;
    assert!(first.starts_with("event: snapshot"), "{}", first);
    assert!(first.contains("\"mode\":\"prepare\""), "{}", first);

    let (status, _) = send(&app, Method::POST, "/skip", None).await;
    assert_eq!(status, StatusCode::OK);

    let mut received = String::new();
    while !(received.contains("event: phase-ended") && received.contains("\"mode\":\"study\"")) {
        received.push_str(&next_frame(&mut body).await);
    }
    assert!(received.contains("\"ended\":\"prepare\""), "{}", received);
    assert!(received.contains("\"remainingSeconds\":3000"), "{}", received);
}
