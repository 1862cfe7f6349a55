use std::{sync::Arc, time::Duration};

use axum::{
    body::{self, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use flip_clock::{api::create_router, state::AppState};

fn test_app(sounds: &[&str]) -> (Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    for sound in sounds {
        std::fs::write(dir.path().join(sound), b"ID3").expect("write sound");
    }
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        dir.path().to_path_buf(),
        Duration::from_secs(1),
    ));
    (create_router(Arc::clone(&state)), state, dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json")
    };
    (status, value)
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).expect("request")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn sounds_lists_mp3_files() {
    let (app, _state, _dir) = test_app(&["chime.mp3", "beep.mp3", "cover.png"]);

    let request = Request::get("/api/sounds").body(Body::empty()).expect("request");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["beep.mp3", "chime.mp3"]));
}

#[tokio::test]
async fn sounds_rejects_other_methods() {
    let (app, _state, _dir) = test_app(&["beep.mp3"]);

    let response = app.clone().oneshot(post("/api/sounds")).await.expect("response");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET");

    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["error"], "Method POST Not Allowed");
}

#[tokio::test]
async fn sounds_reports_unreadable_directory() {
    let (app, state, dir) = test_app(&[]);
    drop(dir);
    assert!(!state.audio_dir.exists());

    let request = Request::get("/api/sounds").body(Body::empty()).expect("request");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error reading audio directory");

    let request = Request::get("/api/settings/sounds").body(Body::empty()).expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["silence", "beep.mp3", "chime.mp3", "alarm.mp3"]));
}

#[tokio::test]
async fn audio_files_are_served() {
    let (app, _state, _dir) = test_app(&["beep.mp3"]);

    let request = Request::get("/audio/beep.mp3").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn digit_edits_clamp_out_of_range_seconds() {
    let (app, _state, _dir) = test_app(&[]);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/timer/digits", json!({"field": "s1", "value": "7"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request("PUT", "/api/timer/digits", json!({"field": "s2", "value": "5"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["display"], "00:00:59");
    assert_eq!(body["timer"]["remainingSeconds"], 59);
}

#[tokio::test]
async fn digit_edit_with_unknown_field_is_bad_request() {
    let (app, _state, _dir) = test_app(&[]);

    let (status, body) = send(
        &app,
        json_request("PUT", "/api/timer/digits", json!({"field": "x9", "value": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("x9"));
}

#[tokio::test]
async fn digit_edit_while_running_conflicts() {
    let (app, state, _dir) = test_app(&[]);

    send(&app, post("/api/timer/add-minute")).await;
    let (status, body) = send(&app, post("/api/timer/start")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/timer/digits", json!({"field": "m2", "value": "3"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, post("/api/timer/stop")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["recorded"]["completed"], false);
    assert_eq!(state.history().unwrap().len(), 1);
}

#[tokio::test]
async fn reset_defaults_to_soft_and_hard_clears() {
    let (app, state, _dir) = test_app(&[]);

    send(&app, post("/api/timer/add-minute")).await;
    send(&app, post("/api/timer/start")).await;

    let (status, body) = send(&app, post("/api/timer/reset")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remainingSeconds"], 60);
    assert_eq!(body["recorded"]["completed"], false);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/timer/reset", json!({"hard": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["display"], "00:00:00");
    // Resetting an idle timer still logs an empty session
    assert_eq!(body["recorded"]["durationSeconds"], 0);
    assert_eq!(state.history().unwrap().len(), 2);
}

#[tokio::test]
async fn idle_stop_logs_empty_session() {
    let (app, state, _dir) = test_app(&[]);

    let (status, body) = send(&app, post("/api/timer/stop")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"]["name"], "Timer");
    assert_eq!(body["recorded"]["durationSeconds"], 0);
    assert_eq!(body["recorded"]["completed"], false);

    let request = Request::get("/api/history").body(Body::empty()).expect("request");
    let (_, body) = send(&app, request).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(state.history().unwrap().len(), 1);
}

#[tokio::test]
async fn add_minute_caps_at_maximum() {
    let (app, _state, _dir) = test_app(&[]);

    for (field, value) in [("h1", "9"), ("h2", "9"), ("m1", "5"), ("m2", "9"), ("s1", "4"), ("s2", "0")] {
        send(
            &app,
            json_request("PUT", "/api/timer/digits", json!({"field": field, "value": value})),
        )
        .await;
    }

    let (_, body) = send(&app, post("/api/timer/add-minute")).await;
    assert_eq!(body["timer"]["display"], "99:59:59");
}

#[tokio::test]
async fn unknown_alarm_sound_falls_back_to_silence() {
    let (app, _state, _dir) = test_app(&["beep.mp3"]);

    let (status, body) = send(
        &app,
        json_request("PATCH", "/api/settings", json!({"alarmSound": "foghorn.mp3"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alarmSound"], "silence");

    let (_, body) = send(&app, post("/api/settings/alarm/toggle")).await;
    assert_eq!(body["alarmSound"], "beep.mp3");
}

#[tokio::test]
async fn dark_mode_toggle_resets_background() {
    let (app, _state, _dir) = test_app(&[]);

    send(
        &app,
        json_request("PATCH", "/api/settings", json!({"backgroundColor": "#ff0000"})),
    )
    .await;

    let (status, body) = send(&app, post("/api/settings/dark-mode")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["darkMode"], true);
    assert_eq!(body["backgroundColor"], "#000000");
}

#[tokio::test]
async fn text_format_changes_display() {
    let (app, _state, _dir) = test_app(&[]);

    send(
        &app,
        json_request("PATCH", "/api/settings", json!({"displayFormat": "text"})),
    )
    .await;
    send(&app, post("/api/timer/add-minute")).await;

    let request = Request::get("/api/timer").body(Body::empty()).expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"], "00h 01m 00s");
}

#[tokio::test]
async fn health_and_status_respond() {
    let (app, _state, _dir) = test_app(&[]);

    let request = Request::get("/health").body(Body::empty()).expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    send(&app, post("/api/timer/add-minute")).await;
    let request = Request::get("/api/status").body(Body::empty()).expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastAction"], "add-minute");
    assert_eq!(body["historyLen"], 0);
}
