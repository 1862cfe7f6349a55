//! Application state shared by the HTTP layer and the countdown task
//!
//! The engine lock is always taken first when locks nest. No lock is held
//! across an `.await`.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{FlipClockError, Result},
    services::{
        alarm::{resolve_sound, AlarmPlayer, LoadOutcome},
        sounds::list_sound_files,
    },
    tasks::Countdown,
};
use super::{
    history::{HistoryLog, TimerHistoryEntry},
    settings::{self, Settings, SettingsUpdate},
    time::DigitField,
    timer_engine::{StopOutcome, TickOutcome, TimerEngine},
    timer_state::TimerSnapshot,
};

/// Single-session state: one engine, its settings, history and alarm
#[derive(Debug)]
pub struct AppState {
    pub engine: Arc<Mutex<TimerEngine>>,
    pub settings: Arc<Mutex<Settings>>,
    pub history: Arc<Mutex<HistoryLog>>,
    pub alarm: Arc<Mutex<AlarmPlayer>>,
    /// Handle of the recurring tick task
    pub countdown: Countdown,
    pub audio_dir: PathBuf,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer snapshot updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    pub fn new(port: u16, host: String, audio_dir: PathBuf, tick_period: Duration) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::idle());

        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new())),
            settings: Arc::new(Mutex::new(Settings::default())),
            history: Arc::new(Mutex::new(HistoryLog::new())),
            alarm: Arc::new(Mutex::new(AlarmPlayer::new())),
            countdown: Countdown::new(tick_period),
            audio_dir,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Set the name recorded in history for subsequent sessions
    pub fn with_timer_name(self, name: &str) -> Self {
        if let Ok(mut settings) = self.settings.lock() {
            settings.timer_name = name.to_string();
        }
        self
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, TimerEngine>> {
        self.engine.lock().map_err(|_| FlipClockError::LockPoisoned("engine"))
    }

    fn lock_settings(&self) -> Result<MutexGuard<'_, Settings>> {
        self.settings.lock().map_err(|_| FlipClockError::LockPoisoned("settings"))
    }

    fn lock_history(&self) -> Result<MutexGuard<'_, HistoryLog>> {
        self.history.lock().map_err(|_| FlipClockError::LockPoisoned("history"))
    }

    fn lock_alarm(&self) -> Result<MutexGuard<'_, AlarmPlayer>> {
        self.alarm.lock().map_err(|_| FlipClockError::LockPoisoned("alarm"))
    }

    // ── Timer intents ────────────────────────────────────────────────

    /// Start a session and schedule the countdown. No-op when running.
    pub fn start_timer(self: &Arc<Self>) -> Result<TimerSnapshot> {
        let mut engine = self.lock_engine()?;
        if engine.start() {
            self.countdown.schedule(Arc::clone(self), engine.session())?;
            info!("Timer started at {}", engine.time());
        } else {
            info!("Timer already running, start ignored");
        }
        drop(engine);

        self.record_action("start");
        self.publish()
    }

    /// Cancel the countdown, silence the alarm and log the session.
    /// Stopping an idle timer still logs a zero-length entry.
    pub fn stop_timer(&self) -> Result<(TimerSnapshot, TimerHistoryEntry)> {
        let mut engine = self.lock_engine()?;
        let outcome = engine.stop();
        let entry = self.finish_session(outcome)?;
        drop(engine);

        self.record_action("stop");
        Ok((self.publish()?, entry))
    }

    /// Stop, then restore the last set value or zero the clock
    pub fn reset_timer(&self, hard: bool) -> Result<(TimerSnapshot, TimerHistoryEntry)> {
        let mut engine = self.lock_engine()?;
        let outcome = engine.reset(hard);
        let entry = self.finish_session(outcome)?;
        info!("Timer reset ({}) to {}", if hard { "hard" } else { "soft" }, engine.time());
        drop(engine);

        self.record_action(if hard { "reset-hard" } else { "reset" });
        Ok((self.publish()?, entry))
    }

    /// Space-bar behaviour: stop when running, start otherwise
    pub fn toggle_timer(self: &Arc<Self>) -> Result<(TimerSnapshot, Option<TimerHistoryEntry>)> {
        let mut engine = self.lock_engine()?;
        let (started, outcome) = engine.toggle();
        let entry = match outcome {
            Some(outcome) => Some(self.finish_session(outcome)?),
            None => {
                if started {
                    self.countdown.schedule(Arc::clone(self), engine.session())?;
                    info!("Timer toggled on at {}", engine.time());
                }
                None
            }
        };
        drop(engine);

        self.record_action("toggle");
        Ok((self.publish()?, entry))
    }

    pub fn add_minute(&self) -> Result<TimerSnapshot> {
        let mut engine = self.lock_engine()?;
        let was_ended = engine.is_ended();
        let remaining = engine.add_minute();
        if was_ended {
            self.lock_alarm()?.stop();
        }
        info!("Added a minute, {}s remaining", remaining);
        drop(engine);

        self.record_action("add-minute");
        self.publish()
    }

    /// Edit one digit while idle
    pub fn set_digit(&self, field: DigitField, input: &str) -> Result<TimerSnapshot> {
        let mut engine = self.lock_engine()?;
        let time = engine.set_digit(field, input).ok_or(FlipClockError::TimerRunning)?;
        info!("Digit {} edited, time set to {}", field.as_str(), time);
        drop(engine);

        self.record_action("set-digit");
        self.publish()
    }

    /// Advance the countdown of `session` by one period. Called by the
    /// countdown task; a tick left over from an earlier session is reported
    /// as `Idle` and changes nothing.
    pub fn tick(&self, session: u64) -> Result<TickOutcome> {
        let mut engine = self.lock_engine()?;
        if engine.session() != session {
            debug!("Dropping tick from session {}, current is {}", session, engine.session());
            return Ok(TickOutcome::Idle);
        }
        let outcome = engine.tick();
        if let TickOutcome::Ended { alarm: true } = outcome {
            self.lock_alarm()?.play();
        }
        drop(engine);

        if matches!(outcome, TickOutcome::Counting(_) | TickOutcome::Ended { alarm: true }) {
            self.publish()?;
        }
        Ok(outcome)
    }

    /// Cancel the countdown, silence the alarm and record the session.
    /// Called with the engine lock held.
    fn finish_session(&self, outcome: StopOutcome) -> Result<TimerHistoryEntry> {
        self.countdown.cancel()?;
        self.lock_alarm()?.stop();

        let name = self.lock_settings()?.timer_name.clone();
        let entry = self
            .lock_history()?
            .record(&name, outcome.duration_seconds, outcome.completed);
        info!("Session recorded: {}", entry);
        Ok(entry)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Result<TimerSnapshot> {
        let engine = self.lock_engine()?;
        let settings = self.lock_settings()?;
        let alarm = self.lock_alarm()?.status();
        Ok(TimerSnapshot::capture(&engine, &settings, alarm))
    }

    pub fn history(&self) -> Result<Vec<TimerHistoryEntry>> {
        Ok(self.lock_history()?.entries())
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(self.lock_settings()?.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Publish the current snapshot to watchers. Unchanged snapshots do not
    /// wake them.
    fn publish(&self) -> Result<TimerSnapshot> {
        let snapshot = self.snapshot()?;
        self.timer_update_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot.clone();
            true
        });
        Ok(snapshot)
    }

    // ── Settings intents ─────────────────────────────────────────────

    pub fn update_settings(&self, update: SettingsUpdate) -> Result<Settings> {
        let sound_changed = self.lock_settings()?.apply(update);
        if sound_changed {
            self.load_alarm_sound()?;
        }

        self.record_action("settings");
        self.publish()?;
        self.settings()
    }

    pub fn toggle_dark_mode(&self) -> Result<Settings> {
        self.lock_settings()?.toggle_dark_mode();
        self.record_action("dark-mode");
        self.settings()
    }

    pub fn reset_background_color(&self) -> Result<Settings> {
        self.lock_settings()?.reset_background_color();
        self.record_action("background-reset");
        self.settings()
    }

    /// Switch the alarm between silence and the last audible sound
    pub fn toggle_alarm(&self) -> Result<Settings> {
        let sound = self.lock_settings()?.toggle_alarm().to_string();
        info!("Alarm sound toggled to: {}", sound);
        self.load_alarm_sound()?;

        self.record_action("alarm-toggle");
        self.publish()?;
        self.settings()
    }

    /// Load the configured alarm sound, falling back to silence.
    ///
    /// A fallback is written back to the settings so the user sees the
    /// alarm is off. While the countdown is ended the new sound keeps
    /// ringing.
    pub fn load_alarm_sound(&self) -> Result<LoadOutcome> {
        let sound = self.lock_settings()?.alarm_sound.clone();
        let resolved = resolve_sound(&self.audio_dir, &sound);

        let engine = self.lock_engine()?;
        let mut alarm = self.lock_alarm()?;
        let outcome = alarm.load(&sound, resolved);
        if outcome == LoadOutcome::Loaded && engine.is_ended() {
            alarm.play();
        }
        drop(alarm);
        drop(engine);

        if outcome == LoadOutcome::FellBackToSilence {
            self.lock_settings()?.fall_back_to_silence(&sound);
        }
        Ok(outcome)
    }

    /// Sounds offered in the settings drawer, `"silence"` first
    pub async fn available_sounds(&self) -> Vec<String> {
        let listing = list_sound_files(&self.audio_dir).await;
        if let Err(e) = &listing {
            warn!("Using fallback sound list: {}", e);
        }
        settings::available_sounds(listing)
    }

    // ── Server metadata ──────────────────────────────────────────────

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Cancel the countdown and silence the alarm before exit
    pub fn shutdown(&self) {
        if let Err(e) = self.countdown.cancel() {
            warn!("Failed to cancel countdown: {}", e);
        }
        if let Ok(mut alarm) = self.alarm.lock() {
            alarm.stop();
        }
    }
}
