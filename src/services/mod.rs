//! Audio services module
//! 
//! This module contains the alarm player and the audio directory listing.

pub mod alarm;
pub mod sounds;

// Re-export main types
pub use alarm::{AlarmPlayer, AlarmStatus, LoadOutcome};
pub use sounds::{check_audio_dir, list_sound_files};
