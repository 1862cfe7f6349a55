//! Six-digit clock representation used at the edit and render boundary
//!
//! The engine counts in whole seconds. `Time` is the `hh:mm:ss` digit view
//! the presentation layer edits one character at a time.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FlipClockError;

/// Largest representable value, 99:59:59
pub const MAX_SECONDS: u32 = 99 * 3600 + 59 * 60 + 59;

/// One of the six digit positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitField {
    H1,
    H2,
    M1,
    M2,
    S1,
    S2,
}

impl DigitField {
    pub const ALL: [DigitField; 6] = [
        DigitField::H1,
        DigitField::H2,
        DigitField::M1,
        DigitField::M2,
        DigitField::S1,
        DigitField::S2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DigitField::H1 => "h1",
            DigitField::H2 => "h2",
            DigitField::M1 => "m1",
            DigitField::M2 => "m2",
            DigitField::S1 => "s1",
            DigitField::S2 => "s2",
        }
    }
}

impl FromStr for DigitField {
    type Err = FlipClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DigitField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FlipClockError::UnknownField(s.to_string()))
    }
}

/// How the clock is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    /// `00:00:00`
    #[default]
    Digital,
    /// `00h 00m 00s`
    Text,
}

/// Six decimal digit characters, `h1 h2 : m1 m2 : s1 s2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub h1: char,
    pub h2: char,
    pub m1: char,
    pub m2: char,
    pub s1: char,
    pub s2: char,
}

impl Time {
    pub fn zero() -> Self {
        Self::from_seconds(0)
    }

    /// Build the digit view of a second count, saturating at 99:59:59
    pub fn from_seconds(total: u32) -> Self {
        let total = total.min(MAX_SECONDS);
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;

        Self {
            h1: digit_char(hours / 10),
            h2: digit_char(hours % 10),
            m1: digit_char(minutes / 10),
            m2: digit_char(minutes % 10),
            s1: digit_char(seconds / 10),
            s2: digit_char(seconds % 10),
        }
    }

    pub fn hours(&self) -> u32 {
        pair_value(self.h1, self.h2)
    }

    pub fn minutes(&self) -> u32 {
        pair_value(self.m1, self.m2)
    }

    pub fn seconds(&self) -> u32 {
        pair_value(self.s1, self.s2)
    }

    pub fn to_seconds(&self) -> u32 {
        self.hours() * 3600 + self.minutes() * 60 + self.seconds()
    }

    /// Replace one digit from raw keyboard input, then clamp.
    ///
    /// Only the last decimal digit in `input` is kept; input without any
    /// digit writes `'0'`. Out-of-range pairs are forced to their maximum
    /// (`99` hours, `59` minutes or seconds) instead of rejecting the edit.
    pub fn with_digit(mut self, field: DigitField, input: &str) -> Self {
        let digit = input
            .chars()
            .filter(|c| c.is_ascii_digit())
            .last()
            .unwrap_or('0');

        match field {
            DigitField::H1 => self.h1 = digit,
            DigitField::H2 => self.h2 = digit,
            DigitField::M1 => self.m1 = digit,
            DigitField::M2 => self.m2 = digit,
            DigitField::S1 => self.s1 = digit,
            DigitField::S2 => self.s2 = digit,
        }

        self.clamped()
    }

    fn clamped(mut self) -> Self {
        if self.hours() > 99 {
            self.h1 = '9';
            self.h2 = '9';
        }
        if self.minutes() > 59 {
            self.m1 = '5';
            self.m2 = '9';
        }
        if self.seconds() > 59 {
            self.s1 = '5';
            self.s2 = '9';
        }
        self
    }

    /// Render in the requested format
    pub fn render(&self, format: DisplayFormat) -> String {
        match format {
            DisplayFormat::Digital => self.to_string(),
            DisplayFormat::Text => format!(
                "{}{}h {}{}m {}{}s",
                self.h1, self.h2, self.m1, self.m2, self.s1, self.s2
            ),
        }
    }

    /// Which digit groups are shown.
    ///
    /// While running, a leading all-zero hours group is hidden, and the
    /// minutes group too once hours and minutes are both zero.
    pub fn visible_groups(&self, running: bool) -> VisibleGroups {
        let hours = !(running && self.hours() == 0);
        let minutes = hours || !(running && self.minutes() == 0);
        VisibleGroups {
            hours,
            minutes,
            seconds: true,
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}:{}{}",
            self.h1, self.h2, self.m1, self.m2, self.s1, self.s2
        )
    }
}

/// Digit groups the display should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleGroups {
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

fn digit_char(value: u32) -> char {
    char::from_digit(value % 10, 10).unwrap_or('0')
}

fn pair_value(tens: char, ones: char) -> u32 {
    tens.to_digit(10).unwrap_or(0) * 10 + ones.to_digit(10).unwrap_or(0)
}
