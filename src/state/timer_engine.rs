//! Countdown state machine
//!
//! The engine is purely synchronous and owns no timers. The countdown task
//! calls [`TimerEngine::tick`] once per period while a session is active.
//!
//! ```text
//! Idle --start--> Running --reaches 0--> Ended
//!  ^                 |                     |
//!  +----stop/reset---+------stop/reset-----+
//!                    ^                     |
//!                    +-----add_minute------+
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::time::{DigitField, Time, MAX_SECONDS};

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
    /// Display pinned at zero, alarm active
    Ended,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session active
    Idle,
    /// Decremented, seconds still remaining
    Counting(u32),
    /// Countdown is at zero. `alarm` is true only on the tick that ended it.
    Ended { alarm: bool },
}

/// What a stopped session amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopOutcome {
    /// Seconds counted down during the session
    pub duration_seconds: u32,
    /// Whether the session reached zero
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    phase: TimerPhase,
    remaining_seconds: u32,
    /// Value restored by a soft reset
    last_set_seconds: u32,
    /// Seconds counted down since the last start
    elapsed_seconds: u32,
    /// Bumped on every start so ticks from an earlier session can be told apart
    session: u64,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine preset to a value, as if it had been typed in
    pub fn with_seconds(seconds: u32) -> Self {
        let seconds = seconds.min(MAX_SECONDS);
        Self {
            remaining_seconds: seconds,
            last_set_seconds: seconds,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Running or ended, i.e. a session is in progress
    pub fn is_running(&self) -> bool {
        self.phase != TimerPhase::Idle
    }

    pub fn is_ended(&self) -> bool {
        self.phase == TimerPhase::Ended
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn last_set_seconds(&self) -> u32 {
        self.last_set_seconds
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn time(&self) -> Time {
        Time::from_seconds(self.remaining_seconds)
    }

    /// Begin a session. Returns false if one is already in progress.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.phase = TimerPhase::Running;
        self.last_set_seconds = self.remaining_seconds;
        self.elapsed_seconds = 0;
        self.session = self.session.wrapping_add(1);
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        match self.phase {
            TimerPhase::Idle => TickOutcome::Idle,
            TimerPhase::Ended => TickOutcome::Ended { alarm: false },
            TimerPhase::Running => {
                if self.remaining_seconds > 0 {
                    self.remaining_seconds -= 1;
                    self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
                }
                if self.remaining_seconds == 0 {
                    debug!("Countdown reached zero after {}s", self.elapsed_seconds);
                    self.phase = TimerPhase::Ended;
                    TickOutcome::Ended { alarm: true }
                } else {
                    TickOutcome::Counting(self.remaining_seconds)
                }
            }
        }
    }

    /// End the session. Stopping an idle engine yields a zero-length,
    /// uncompleted outcome.
    pub fn stop(&mut self) -> StopOutcome {
        let outcome = StopOutcome {
            duration_seconds: self.elapsed_seconds,
            completed: self.phase == TimerPhase::Ended,
        };
        self.phase = TimerPhase::Idle;
        self.elapsed_seconds = 0;
        outcome
    }

    /// Stop, then restore the last set value (soft) or zero everything (hard)
    pub fn reset(&mut self, hard: bool) -> StopOutcome {
        let outcome = self.stop();
        if hard {
            self.remaining_seconds = 0;
            self.last_set_seconds = 0;
        } else {
            self.remaining_seconds = self.last_set_seconds;
        }
        outcome
    }

    /// Add sixty seconds, capped at 99:59:59.
    ///
    /// An ended session resumes counting.
    pub fn add_minute(&mut self) -> u32 {
        self.remaining_seconds = self.remaining_seconds.saturating_add(60).min(MAX_SECONDS);
        if self.phase == TimerPhase::Ended {
            self.phase = TimerPhase::Running;
        }
        self.remaining_seconds
    }

    /// Edit one digit. Ignored while a session is in progress.
    pub fn set_digit(&mut self, field: DigitField, input: &str) -> Option<Time> {
        if self.is_running() {
            return None;
        }
        let time = self.time().with_digit(field, input);
        self.remaining_seconds = time.to_seconds();
        self.last_set_seconds = self.remaining_seconds;
        Some(time)
    }

    /// Start if idle, stop otherwise
    pub fn toggle(&mut self) -> (bool, Option<StopOutcome>) {
        if self.is_running() {
            (false, Some(self.stop()))
        } else {
            (self.start(), None)
        }
    }
}
