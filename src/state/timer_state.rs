//! Published timer state, the view the presentation layer renders

use serde::Serialize;

use crate::services::alarm::AlarmStatus;
use super::{
    settings::Settings,
    time::{Time, VisibleGroups},
    timer_engine::{TimerEngine, TimerPhase},
};

/// Snapshot of the engine plus what the display needs to render it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub running: bool,
    pub ended: bool,
    pub remaining_seconds: u32,
    pub last_set_seconds: u32,
    pub time: Time,
    /// Time rendered in the configured display format
    pub display: String,
    pub visible: VisibleGroups,
    /// Ended with flash-on-end enabled
    pub flashing: bool,
    /// CSS font stack for the digits
    pub font_stack: &'static str,
    pub alarm: AlarmStatus,
}

impl TimerSnapshot {
    pub fn capture(engine: &TimerEngine, settings: &Settings, alarm: AlarmStatus) -> Self {
        let time = engine.time();
        let running = engine.is_running();

        Self {
            phase: engine.phase(),
            running,
            ended: engine.is_ended(),
            remaining_seconds: engine.remaining_seconds(),
            last_set_seconds: engine.last_set_seconds(),
            time,
            display: time.render(settings.display_format),
            visible: time.visible_groups(running),
            flashing: engine.is_ended() && settings.flash_on_end,
            font_stack: settings.font_family.css_stack(),
            alarm,
        }
    }

    /// Initial idle state at 00:00:00
    pub fn idle() -> Self {
        Self::capture(
            &TimerEngine::new(),
            &Settings::default(),
            AlarmStatus {
                playing: false,
                looping: false,
                sound_id: None,
                src: None,
            },
        )
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::time::DisplayFormat;

    #[test]
    fn idle_snapshot_is_zero() {
        let snapshot = TimerSnapshot::idle();
        assert_eq!(snapshot.display, "00:00:00");
        assert!(!snapshot.running);
        assert!(!snapshot.flashing);
    }

    #[test]
    fn flashing_follows_setting() {
        let mut engine = TimerEngine::new();
        engine.start();
        engine.tick();

        let mut settings = Settings::default();
        let alarm = TimerSnapshot::idle().alarm;
        assert!(TimerSnapshot::capture(&engine, &settings, alarm.clone()).flashing);

        settings.flash_on_end = false;
        assert!(!TimerSnapshot::capture(&engine, &settings, alarm).flashing);
    }

    #[test]
    fn display_uses_format() {
        let engine = TimerEngine::with_seconds(65);
        let mut settings = Settings::default();
        settings.display_format = DisplayFormat::Text;
        let snapshot = TimerSnapshot::capture(&engine, &settings, TimerSnapshot::idle().alarm);
        assert_eq!(snapshot.display, "00h 01m 05s");
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(TimerSnapshot::idle()).unwrap();
        assert_eq!(json["remainingSeconds"], 0);
        assert_eq!(json["lastSetSeconds"], 0);
        assert_eq!(json["fontStack"], Settings::default().font_family.css_stack());
        assert_eq!(json["alarm"]["soundId"], serde_json::Value::Null);
        assert!(json.get("remaining_seconds").is_none());
    }
}
