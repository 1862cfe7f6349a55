//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{services::alarm::AUDIO_URL_PREFIX, state::AppState};
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let audio_files = ServeDir::new(&state.audio_dir);

    Router::new()
        .route("/api/sounds", get(sounds_handler).fallback(sounds_method_not_allowed))
        .route("/api/timer", get(timer_handler))
        .route("/api/timer/stream", get(timer_stream_handler))
        .route("/api/timer/start", post(start_handler))
        .route("/api/timer/stop", post(stop_handler))
        .route("/api/timer/toggle", post(toggle_handler))
        .route("/api/timer/reset", post(reset_handler))
        .route("/api/timer/add-minute", post(add_minute_handler))
        .route("/api/timer/digits", put(digits_handler))
        .route("/api/history", get(history_handler))
        .route("/api/settings", get(settings_handler).patch(update_settings_handler))
        .route("/api/settings/sounds", get(available_sounds_handler))
        .route("/api/settings/dark-mode", post(dark_mode_handler))
        .route("/api/settings/background/reset", post(reset_background_handler))
        .route("/api/settings/alarm/toggle", post(alarm_toggle_handler))
        .route("/api/status", get(status_handler))
        .route("/health", get(health_handler))
        .nest_service(AUDIO_URL_PREFIX, audio_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
