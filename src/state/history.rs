//! Bounded log of past timer sessions

use std::{collections::VecDeque, fmt};

use serde::{Deserialize, Serialize};

/// Number of sessions kept
pub const HISTORY_CAPACITY: usize = 10;

const UNNAMED_TIMER: &str = "Unnamed Timer";

/// One stopped or completed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerHistoryEntry {
    pub name: String,
    pub duration_seconds: u32,
    pub completed: bool,
}

impl fmt::Display for TimerHistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.name,
            format_duration(self.duration_seconds),
            if self.completed { "Completed" } else { "Stopped" }
        )
    }
}

/// Most-recent-first ring of sessions, oldest evicted on overflow
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: VecDeque<TimerHistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    pub fn record(&mut self, name: &str, duration_seconds: u32, completed: bool) -> TimerHistoryEntry {
        let name = if name.trim().is_empty() {
            UNNAMED_TIMER.to_string()
        } else {
            name.to_string()
        };
        let entry = TimerHistoryEntry {
            name,
            duration_seconds,
            completed,
        };

        self.entries.push_front(entry.clone());
        self.entries.truncate(HISTORY_CAPACITY);
        entry
    }

    pub fn entries(&self) -> Vec<TimerHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `"{h}h {m}m {s}s"` as shown in the history list
pub fn format_duration(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}
