//! Recurring countdown task and its cancellation handle

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::{
    error::{FlipClockError, Result},
    state::{AppState, TickOutcome},
};

/// Owns the handle of the one outstanding countdown task, if any
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: Mutex::new(None),
        }
    }

    /// Spawn the countdown task for `session` unless one is already live.
    ///
    /// Returns false when a task was already scheduled.
    pub fn schedule(&self, state: Arc<AppState>, session: u64) -> Result<bool> {
        let mut handle = self.handle.lock()
            .map_err(|_| FlipClockError::LockPoisoned("countdown"))?;

        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("Countdown already scheduled");
            return Ok(false);
        }

        *handle = Some(tokio::spawn(countdown_task(state, self.period, session)));
        Ok(true)
    }

    /// Abort the outstanding task. Returns false if none was live.
    pub fn cancel(&self) -> Result<bool> {
        let mut handle = self.handle.lock()
            .map_err(|_| FlipClockError::LockPoisoned("countdown"))?;

        match handle.take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                debug!("Countdown cancelled");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle
            .lock()
            .map(|handle| handle.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }
}

/// Tick the engine once per period until the session ends.
///
/// The first tick fires one full period after the task starts. An abort only
/// lands at the next `.await`, so a tick already waiting on the engine lock
/// carries its session and is discarded once a newer session has started.
pub async fn countdown_task(state: Arc<AppState>, period: Duration, session: u64) {
    info!("Starting countdown task for session {} ({}ms period)", session, period.as_millis());

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match state.tick(session) {
            Ok(TickOutcome::Idle) => {
                debug!("No active session, countdown task exiting");
                break;
            }
            Ok(TickOutcome::Counting(remaining)) => {
                debug!("Countdown tick: {}s remaining", remaining);
            }
            Ok(TickOutcome::Ended { alarm }) => {
                if alarm {
                    info!("Countdown finished");
                }
            }
            Err(e) => {
                error!("Countdown tick failed: {}", e);
                break;
            }
        }
    }
}
