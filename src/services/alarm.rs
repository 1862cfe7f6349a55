//! Alarm playback state
//!
//! [`resolve_sound`] maps a sound id to a file under the audio directory and
//! touches the filesystem, so callers run it before taking the player lock.
//! The player tracks the loaded clip and looped playback. Audio output itself
//! happens in the presentation layer, which mirrors [`AlarmStatus`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::{FlipClockError, Result},
    state::settings::SILENCE,
};

/// URL prefix the audio directory is served under
pub const AUDIO_URL_PREFIX: &str = "/audio";

/// Extension of playable alarm clips
pub const AUDIO_EXTENSION: &str = "mp3";

/// A resolved, playable sound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmClip {
    pub sound_id: String,
    pub path: PathBuf,
}

impl AlarmClip {
    pub fn url(&self) -> String {
        format!("{}/{}", AUDIO_URL_PREFIX, self.sound_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Silenced,
    /// The sound could not be resolved, the alarm is now silent
    FellBackToSilence,
}

/// Serializable view for snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmStatus {
    pub playing: bool,
    pub looping: bool,
    pub sound_id: Option<String>,
    pub src: Option<String>,
}

#[derive(Debug, Default)]
pub struct AlarmPlayer {
    clip: Option<AlarmClip>,
    playing: bool,
}

impl AlarmPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip(&self) -> Option<&AlarmClip> {
        self.clip.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Swap in the result of [`resolve_sound`]. Never fails: a sound that
    /// did not resolve degrades to silence.
    pub fn load(&mut self, sound_id: &str, resolved: Result<Option<AlarmClip>>) -> LoadOutcome {
        self.stop();

        match resolved {
            Ok(Some(clip)) => {
                info!("Loaded alarm sound: {}", clip.path.display());
                self.clip = Some(clip);
                LoadOutcome::Loaded
            }
            Ok(None) => {
                self.clip = None;
                debug!("Alarm silenced");
                LoadOutcome::Silenced
            }
            Err(e) => {
                warn!("Audio file {} not available ({}). Disabling alarm.", sound_id, e);
                self.clip = None;
                LoadOutcome::FellBackToSilence
            }
        }
    }

    /// Start looped playback. No-op if already playing or silent.
    pub fn play(&mut self) -> bool {
        if self.playing {
            return false;
        }
        match &self.clip {
            Some(clip) => {
                info!("Alarm playing: {}", clip.sound_id);
                self.playing = true;
                true
            }
            None => {
                debug!("Alarm is silent, nothing to play");
                false
            }
        }
    }

    /// Stop playback; the next `play` starts from the beginning.
    /// Safe to call when nothing is playing.
    pub fn stop(&mut self) {
        if self.playing {
            info!("Alarm stopped");
        }
        self.playing = false;
    }

    pub fn status(&self) -> AlarmStatus {
        AlarmStatus {
            playing: self.playing,
            looping: self.clip.is_some(),
            sound_id: self.clip.as_ref().map(|c| c.sound_id.clone()),
            src: self.clip.as_ref().map(AlarmClip::url),
        }
    }
}

/// Resolve a sound id against the audio directory.
///
/// `Ok(None)` is silence. Only bare `.mp3` file names naming an existing
/// regular file resolve to a clip.
pub fn resolve_sound(audio_dir: &Path, sound_id: &str) -> Result<Option<AlarmClip>> {
    if sound_id == SILENCE {
        return Ok(None);
    }

    let file_name = Path::new(sound_id);
    let is_bare_name = file_name.file_name().is_some_and(|n| n == file_name.as_os_str());
    let is_audio = file_name.extension().and_then(|e| e.to_str()) == Some(AUDIO_EXTENSION);
    if !is_bare_name || !is_audio {
        return Err(FlipClockError::InvalidSoundId(sound_id.to_string()));
    }

    let path = audio_dir.join(file_name);
    let metadata = std::fs::metadata(&path).map_err(|source| FlipClockError::SoundUnavailable {
        path: path.clone(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(FlipClockError::NotAFile(path));
    }

    Ok(Some(AlarmClip {
        sound_id: sound_id.to_string(),
        path,
    }))
}
