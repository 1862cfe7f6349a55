//! Audio asset directory listing

use std::path::Path;

use tracing::{debug, error};

use crate::error::{FlipClockError, Result};
use super::alarm::AUDIO_EXTENSION;

/// List the alarm clips (`*.mp3` files) in the audio directory, sorted by name
pub async fn list_sound_files(audio_dir: &Path) -> Result<Vec<String>> {
    debug!("Listing sounds in {}", audio_dir.display());

    let directory_error = |source| FlipClockError::AudioDirectory {
        path: audio_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(audio_dir).await.map_err(directory_error)?;
    let mut sounds = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(directory_error)? {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if name.ends_with(&format!(".{}", AUDIO_EXTENSION)) {
            sounds.push(name.to_string());
        }
    }

    sounds.sort();
    debug!("Found {} sounds", sounds.len());
    Ok(sounds)
}

/// Ensure the audio directory exists at startup, logging if it does not
pub async fn check_audio_dir(audio_dir: &Path) -> bool {
    match tokio::fs::metadata(audio_dir).await {
        Ok(metadata) if metadata.is_dir() => true,
        Ok(_) => {
            error!("Audio path {} is not a directory", audio_dir.display());
            false
        }
        Err(e) => {
            error!("Audio directory {} is not readable: {}", audio_dir.display(), e);
            false
        }
    }
}
