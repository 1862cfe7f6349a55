//! State management module
//! 
//! This module contains the timer engine, settings, history and the
//! application state that ties them together.

pub mod time;
pub mod timer_engine;
pub mod timer_state;
pub mod history;
pub mod settings;
pub mod app_state;

// Re-export main types
pub use time::{DigitField, DisplayFormat, Time, MAX_SECONDS};
pub use timer_engine::{StopOutcome, TickOutcome, TimerEngine, TimerPhase};
pub use timer_state::TimerSnapshot;
pub use history::{HistoryLog, TimerHistoryEntry, HISTORY_CAPACITY};
pub use settings::{Settings, SettingsUpdate};
pub use app_state::AppState;
