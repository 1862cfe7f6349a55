//! User-adjustable display and alarm preferences

use serde::{Deserialize, Serialize};
use tracing::info;

use super::time::DisplayFormat;

/// Sound id that disables the alarm
pub const SILENCE: &str = "silence";
pub const DEFAULT_ALARM_SOUND: &str = "beep.mp3";

/// Offered when the audio directory cannot be listed
pub const FALLBACK_SOUNDS: [&str; 3] = ["beep.mp3", "chime.mp3", "alarm.mp3"];

pub const LIGHT_BACKGROUND: &str = "#ffffff";
pub const DARK_BACKGROUND: &str = "#000000";

pub const MIN_DIGIT_SIZE: f32 = 1.0;
pub const MAX_DIGIT_SIZE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Mono,
    Sans,
    Serif,
    Roboto,
    Lato,
}

impl FontFamily {
    /// CSS font stack for the digit inputs
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Mono => "monospace",
            FontFamily::Sans => "sans-serif",
            FontFamily::Serif => "serif",
            FontFamily::Roboto => "\"Roboto\", sans-serif",
            FontFamily::Lato => "\"Lato\", sans-serif",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub timer_name: String,
    pub background_color: String,
    pub dark_mode: bool,
    /// Digit height in rem
    pub digit_size: f32,
    pub font_family: FontFamily,
    /// File name under the audio directory, or `"silence"`
    pub alarm_sound: String,
    pub flash_on_end: bool,
    pub display_format: DisplayFormat,
    /// Sound restored when the alarm is toggled back on
    #[serde(skip)]
    last_audible_sound: Option<String>,
}

/// Partial update, every field optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub timer_name: Option<String>,
    pub background_color: Option<String>,
    pub dark_mode: Option<bool>,
    pub digit_size: Option<f32>,
    pub font_family: Option<FontFamily>,
    pub alarm_sound: Option<String>,
    pub flash_on_end: Option<bool>,
    pub display_format: Option<DisplayFormat>,
}

impl Settings {
    /// Apply a partial update. Returns true if the alarm sound changed.
    pub fn apply(&mut self, update: SettingsUpdate) -> bool {
        if let Some(name) = update.timer_name {
            self.timer_name = name;
        }
        if let Some(color) = update.background_color {
            self.background_color = color;
        }
        if let Some(dark) = update.dark_mode {
            self.dark_mode = dark;
        }
        if let Some(size) = update.digit_size {
            self.set_digit_size(size);
        }
        if let Some(font) = update.font_family {
            self.font_family = font;
        }
        if let Some(flash) = update.flash_on_end {
            self.flash_on_end = flash;
        }
        if let Some(format) = update.display_format {
            self.display_format = format;
        }

        match update.alarm_sound {
            Some(sound) if sound != self.alarm_sound => {
                self.set_alarm_sound(sound);
                true
            }
            _ => false,
        }
    }

    pub fn set_digit_size(&mut self, size: f32) {
        self.digit_size = if size.is_finite() {
            size.clamp(MIN_DIGIT_SIZE, MAX_DIGIT_SIZE)
        } else {
            Settings::default().digit_size
        };
    }

    pub fn set_alarm_sound(&mut self, sound: String) {
        if sound != SILENCE {
            self.last_audible_sound = Some(sound.clone());
        }
        self.alarm_sound = sound;
    }

    /// Silence the alarm after `failed` could not be loaded
    pub fn fall_back_to_silence(&mut self, failed: &str) {
        if self.alarm_sound == failed {
            self.alarm_sound = SILENCE.to_string();
        }
        if self.last_audible_sound.as_deref() == Some(failed) {
            self.last_audible_sound = None;
        }
    }

    pub fn is_silent(&self) -> bool {
        self.alarm_sound == SILENCE
    }

    /// Flip dark mode and reset the background to the new mode's default
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.reset_background_color();
        info!("Dark mode set to: {}", self.dark_mode);
    }

    pub fn reset_background_color(&mut self) {
        self.background_color = self.default_background().to_string();
    }

    pub fn default_background(&self) -> &'static str {
        if self.dark_mode {
            DARK_BACKGROUND
        } else {
            LIGHT_BACKGROUND
        }
    }

    /// Switch between silence and the last audible sound. Returns the new id.
    pub fn toggle_alarm(&mut self) -> &str {
        if self.is_silent() {
            let sound = self
                .last_audible_sound
                .clone()
                .unwrap_or_else(|| DEFAULT_ALARM_SOUND.to_string());
            self.alarm_sound = sound;
        } else {
            self.last_audible_sound = Some(self.alarm_sound.clone());
            self.alarm_sound = SILENCE.to_string();
        }
        &self.alarm_sound
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_name: "Timer".to_string(),
            background_color: LIGHT_BACKGROUND.to_string(),
            dark_mode: false,
            digit_size: 4.0,
            font_family: FontFamily::default(),
            alarm_sound: DEFAULT_ALARM_SOUND.to_string(),
            flash_on_end: true,
            display_format: DisplayFormat::default(),
            last_audible_sound: None,
        }
    }
}

/// Sound choices offered to the user, `"silence"` first.
///
/// A failed listing is replaced by [`FALLBACK_SOUNDS`].
pub fn available_sounds<E>(listing: Result<Vec<String>, E>) -> Vec<String> {
    let sounds = listing.unwrap_or_else(|_| FALLBACK_SOUNDS.iter().map(|s| s.to_string()).collect());

    std::iter::once(SILENCE.to_string())
        .chain(sounds.into_iter().filter(|s| s != SILENCE))
        .collect()
}
