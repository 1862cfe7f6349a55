//! Flip Clock - A single-session countdown service
//!
//! This is the main entry point for the flip-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use flip_clock::{
    api::create_router,
    config::Config,
    services::{check_audio_dir, LoadOutcome},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("flip_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting flip-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, audio_dir={}, tick={}ms",
          config.host, config.port, config.audio_dir.display(), config.tick_ms);

    // A missing audio directory only disables the alarm
    if !check_audio_dir(&config.audio_dir).await {
        warn!("Alarm sounds unavailable, the sound list will use fallbacks");
    }

    // Create application state
    let state = Arc::new(
        AppState::new(
            config.port,
            config.host.clone(),
            config.audio_dir.clone(),
            config.tick_period(),
        )
        .with_timer_name(&config.timer_name),
    );

    if state.load_alarm_sound()? == LoadOutcome::FellBackToSilence {
        warn!("Default alarm sound not found, alarm is silent");
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /api/sounds            - List alarm sound files");
    info!("  GET  /api/timer             - Current timer state");
    info!("  GET  /api/timer/stream      - Timer state as server-sent events");
    info!("  POST /api/timer/start|stop|toggle|reset|add-minute");
    info!("  PUT  /api/timer/digits      - Edit one digit");
    info!("  GET  /api/history           - Last 10 sessions");
    info!("  GET|PATCH /api/settings     - Display and alarm settings");
    info!("  GET  /health                - Health check");

    // Open timer streams never finish, so shutdown drops the server
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal(state) => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
