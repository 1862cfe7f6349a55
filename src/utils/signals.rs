//! Signal handling for graceful shutdown

use std::{io, sync::Arc};

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::{info, warn};

use crate::state::AppState;

/// Wait for SIGTERM or SIGINT
pub async fn wait_for_signal() -> io::Result<i32> {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])?;
    let handle = signals.handle();

    let signal = signals.next().await.unwrap_or(signal_hook::consts::SIGTERM);
    handle.close();
    Ok(signal)
}

/// Resolve on a shutdown signal, after cancelling the countdown and
/// silencing the alarm
pub async fn shutdown_signal(state: Arc<AppState>) {
    match wait_for_signal().await {
        Ok(signal) => info!("Received signal: {}", signal),
        Err(e) => {
            warn!("Failed to install signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    }

    state.shutdown();
}
