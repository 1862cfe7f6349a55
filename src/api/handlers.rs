//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json,
    },
};
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::WatchStream;
use tracing::{error, info, warn};

use crate::{
    error::FlipClockError,
    services::list_sound_files,
    state::{AppState, DigitField, Settings, SettingsUpdate, TimerHistoryEntry, TimerSnapshot},
};
use super::responses::{
    DigitRequest, ErrorResponse, HealthResponse, ResetRequest, StatusResponse, TimerResponse,
};

type ApiResult<T> = Result<Json<T>, FlipClockError>;

/// Handle GET /api/sounds - List the .mp3 files in the audio directory
pub async fn sounds_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    match list_sound_files(&state.audio_dir).await {
        Ok(sounds) => Ok(Json(sounds)),
        Err(e) => {
            error!("Error reading audio directory: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error reading audio directory")),
            ))
        }
    }
}

/// Any method other than GET on /api/sounds
pub async fn sounds_method_not_allowed(method: Method) -> impl IntoResponse {
    warn!("Rejected {} /api/sounds", method);
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        Json(ErrorResponse::new(format!("Method {} Not Allowed", method))),
    )
}

/// Handle GET /api/timer - Current timer snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerSnapshot> {
    Ok(Json(state.snapshot()?))
}

/// Handle GET /api/timer/stream - Server-sent snapshot updates
pub async fn timer_stream_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Timer stream subscriber connected");

    let stream = WatchStream::new(state.subscribe()).map(|snapshot| {
        let event = Event::default()
            .event("timer")
            .json_data(&snapshot)
            .unwrap_or_else(|e| {
                warn!("Failed to encode timer snapshot: {}", e);
                Event::default().event("error").data(e.to_string())
            });
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle POST /api/timer/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.start_timer()?;
    Ok(Json(TimerResponse::new("Timer started", timer)))
}

/// Handle POST /api/timer/stop
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let (timer, recorded) = state.stop_timer()?;
    Ok(Json(TimerResponse::new("Timer stopped", timer).with_recorded(Some(recorded))))
}

/// Handle POST /api/timer/toggle - Start when idle, stop otherwise
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let (timer, recorded) = state.toggle_timer()?;
    let message = if timer.running { "Timer started" } else { "Timer stopped" };
    Ok(Json(TimerResponse::new(message, timer).with_recorded(recorded)))
}

/// Handle POST /api/timer/reset - Soft reset unless `{"hard": true}`
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ResetRequest>>,
) -> ApiResult<TimerResponse> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let (timer, recorded) = state.reset_timer(request.hard)?;
    let message = if request.hard { "Timer cleared" } else { "Timer reset" };
    Ok(Json(TimerResponse::new(message, timer).with_recorded(Some(recorded))))
}

/// Handle POST /api/timer/add-minute
pub async fn add_minute_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.add_minute()?;
    Ok(Json(TimerResponse::new("Added one minute", timer)))
}

/// Handle PUT /api/timer/digits - Edit one digit while idle
pub async fn digits_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DigitRequest>,
) -> ApiResult<TimerResponse> {
    let field: DigitField = request.field.parse()?;
    let timer = state.set_digit(field, &request.value)?;
    Ok(Json(TimerResponse::new("Digit updated", timer)))
}

/// Handle GET /api/history
pub async fn history_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TimerHistoryEntry>> {
    Ok(Json(state.history()?))
}

/// Handle GET /api/settings
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
    Ok(Json(state.settings()?))
}

/// Handle PATCH /api/settings - Partial update
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Settings> {
    Ok(Json(state.update_settings(update)?))
}

/// Handle POST /api/settings/dark-mode
pub async fn dark_mode_handler(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
    Ok(Json(state.toggle_dark_mode()?))
}

/// Handle POST /api/settings/background/reset
pub async fn reset_background_handler(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
    Ok(Json(state.reset_background_color()?))
}

/// Handle POST /api/settings/alarm/toggle
pub async fn alarm_toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult<Settings> {
    Ok(Json(state.toggle_alarm()?))
}

/// Handle GET /api/settings/sounds - Choices including "silence"
pub async fn available_sounds_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.available_sounds().await)
}

/// Handle GET /api/status - Timer plus server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let timer = state.snapshot()?;
    let history_len = state.history()?.len();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        history_len,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
