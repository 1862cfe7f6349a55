//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    error::FlipClockError,
    state::{TimerHistoryEntry, TimerSnapshot},
};

/// Response for timer intents
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
    /// Session logged by this intent, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded: Option<TimerHistoryEntry>,
}

impl TimerResponse {
    pub fn new(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        let status = if timer.ended {
            "ended"
        } else if timer.running {
            "running"
        } else {
            "idle"
        };

        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
            recorded: None,
        }
    }

    pub fn with_recorded(mut self, recorded: Option<TimerHistoryEntry>) -> Self {
        self.recorded = recorded;
        self
    }
}

/// Body of `POST /api/timer/reset`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetRequest {
    /// Zero the clock instead of restoring the last set value
    #[serde(default)]
    pub hard: bool,
}

/// Body of `PUT /api/timer/digits`
#[derive(Debug, Clone, Deserialize)]
pub struct DigitRequest {
    pub field: String,
    pub value: String,
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub history_len: usize,
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
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// JSON error body, `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

impl IntoResponse for FlipClockError {
    fn into_response(self) -> Response {
        let status = match &self {
            FlipClockError::TimerRunning => StatusCode::CONFLICT,
            FlipClockError::UnknownField(_) => StatusCode::BAD_REQUEST,
            FlipClockError::LockPoisoned(_)
            | FlipClockError::AudioDirectory { .. }
            | FlipClockError::InvalidSoundId(_)
            | FlipClockError::SoundUnavailable { .. }
            | FlipClockError::NotAFile(_) => {
                error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
