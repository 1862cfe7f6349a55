use std::{sync::Arc, time::Duration};

use tempfile::TempDir;
use tokio::time::sleep;

use flip_clock::state::{AppState, DigitField, TimerPhase};

fn test_state() -> (Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("beep.mp3"), b"ID3").expect("write sound");
    let state = AppState::new(
        0,
        "127.0.0.1".to_string(),
        dir.path().to_path_buf(),
        Duration::from_secs(1),
    )
    .with_timer_name("Eggs");
    (Arc::new(state), dir)
}

#[tokio::test(start_paused = true)]
async fn five_second_countdown_ends_with_alarm() {
    let (state, _dir) = test_state();
    state.load_alarm_sound().expect("load");
    state.set_digit(DigitField::S2, "5").expect("edit");

    state.start_timer().expect("start");
    sleep(Duration::from_millis(5_500)).await;

    let snapshot = state.snapshot().expect("snapshot");
    assert_eq!(snapshot.phase, TimerPhase::Ended);
    assert_eq!(snapshot.display, "00:00:00");
    assert!(snapshot.alarm.playing);
    assert!(snapshot.flashing);

    // Stays pinned at zero while ended
    sleep(Duration::from_secs(3)).await;
    assert_eq!(state.snapshot().expect("snapshot").remaining_seconds, 0);

    let (snapshot, entry) = state.stop_timer().expect("stop");
    assert!(!snapshot.alarm.playing);
    assert_eq!(entry.name, "Eggs");
    assert_eq!(entry.duration_seconds, 5);
    assert!(entry.completed);
}

#[tokio::test(start_paused = true)]
async fn repeated_start_does_not_double_tick() {
    let (state, _dir) = test_state();
    state.set_digit(DigitField::S1, "1").expect("edit");

    state.start_timer().expect("start");
    state.start_timer().expect("start again");
    sleep(Duration::from_millis(3_500)).await;

    assert_eq!(state.snapshot().expect("snapshot").remaining_seconds, 7);
    state.shutdown();
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_ticking() {
    let (state, _dir) = test_state();
    state.set_digit(DigitField::S1, "1").expect("edit");

    state.start_timer().expect("start");
    sleep(Duration::from_millis(2_500)).await;
    let (_, entry) = state.stop_timer().expect("stop");
    assert_eq!(entry.duration_seconds, 2);
    assert!(!state.countdown.is_scheduled());

    sleep(Duration::from_secs(5)).await;
    let snapshot = state.snapshot().expect("snapshot");
    assert_eq!(snapshot.phase, TimerPhase::Idle);
    assert_eq!(snapshot.remaining_seconds, 8);
}

#[tokio::test(start_paused = true)]
async fn soft_reset_restores_started_value() {
    let (state, _dir) = test_state();
    state.add_minute().expect("add");

    state.start_timer().expect("start");
    sleep(Duration::from_millis(4_500)).await;
    assert_eq!(state.snapshot().expect("snapshot").remaining_seconds, 56);

    let (snapshot, _) = state.reset_timer(false).expect("reset");
    assert_eq!(snapshot.remaining_seconds, 60);
    assert_eq!(snapshot.phase, TimerPhase::Idle);

    let (snapshot, _) = state.reset_timer(true).expect("reset");
    assert_eq!(snapshot.display, "00:00:00");
}

#[tokio::test(start_paused = true)]
async fn history_keeps_last_ten_sessions() {
    let (state, _dir) = test_state();

    for _ in 0..12 {
        state.add_minute().expect("add");
        state.start_timer().expect("start");
        sleep(Duration::from_millis(1_500)).await;
        state.stop_timer().expect("stop");
    }

    let history = state.history().expect("history");
    assert_eq!(history.len(), 10);
    assert!(history.iter().all(|entry| entry.duration_seconds == 1 && !entry.completed));
}

#[tokio::test(start_paused = true)]
async fn watchers_see_each_tick() {
    let (state, _dir) = test_state();
    let mut rx = state.subscribe();
    state.set_digit(DigitField::S2, "3").expect("edit");

    state.start_timer().expect("start");
    rx.borrow_and_update();

    rx.changed().await.expect("tick update");
    assert_eq!(rx.borrow_and_update().remaining_seconds, 2);
    state.shutdown();
}
