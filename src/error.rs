//! Error types shared by the state, service and API layers

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by flip-clock operations.
///
/// The timer engine itself never fails; these cover the plumbing around it.
#[derive(Error, Debug)]
pub enum FlipClockError {
    /// A shared state mutex was poisoned by a panicking holder
    #[error("Failed to lock {0} state")]
    LockPoisoned(&'static str),

    /// Digit edits are rejected while a session is active
    #[error("Timer is running, digits cannot be edited")]
    TimerRunning,

    /// Digit field name outside h1..s2
    #[error("Unknown digit field: {0}")]
    UnknownField(String),

    /// The audio asset directory could not be read
    #[error("Error reading audio directory {path}: {source}")]
    AudioDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sound ids must be a bare `.mp3` file name inside the audio directory
    #[error("Invalid sound id {0}, expected a plain .mp3 file name")]
    InvalidSoundId(String),

    /// The sound file is missing or unreadable
    #[error("Sound file {path} not available: {source}")]
    SoundUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sound path {0} is not a regular file")]
    NotAFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, FlipClockError>;
