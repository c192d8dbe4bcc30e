//! Integration tests for the session clock and alarm scheduling.

use std::sync::{Arc, Mutex};

use focustone_core::alarm::{self, INTER_REPEAT_GAP_SECS};
use focustone_core::{
    AlarmSequencer, ClockStatus, Event, FocusController, Intent, RecordingSink, SessionClock,
    SessionKind, WaveShape,
};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn recording_controller() -> (FocusController, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    (FocusController::new(sink.clone()), sink)
}

#[test]
fn select_kind_resets_progress() {
    for kind in SessionKind::ALL {
        let mut clock = SessionClock::new();
        clock.start();
        clock.tick();
        clock.select_kind(kind);
        assert_eq!(clock.progress_fraction(), 0.0, "{kind}");
        assert_eq!(clock.remaining_secs(), kind.duration_secs());
    }
}

proptest! {
    #[test]
    fn n_ticks_remove_n_seconds(kind_index in 0usize..3, seed in 1u64..=1500) {
        let kind = SessionKind::ALL[kind_index];
        let duration = kind.duration_secs();
        let n = (seed - 1) % duration + 1;

        let expiries = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&expiries);
        let mut clock = SessionClock::with_kind(kind);
        clock.subscribe(move |event| {
            if matches!(event, Event::SessionExpired { .. }) {
                *counter.lock().unwrap() += 1;
            }
        });

        clock.start();
        for _ in 0..n {
            clock.tick();
        }

        prop_assert_eq!(clock.remaining_secs(), duration - n);
        if n == duration {
            prop_assert_eq!(clock.status(), ClockStatus::Expired);
            prop_assert_eq!(*expiries.lock().unwrap(), 1);
        } else {
            prop_assert_eq!(clock.status(), ClockStatus::Running);
            prop_assert_eq!(*expiries.lock().unwrap(), 0);
        }
    }

    #[test]
    fn progress_stays_in_unit_range(n in 0u64..=300) {
        let mut clock = SessionClock::with_kind(SessionKind::ShortBreak);
        clock.start();
        for _ in 0..n {
            clock.tick();
        }
        let progress = clock.progress_fraction();
        prop_assert!((0.0..=1.0).contains(&progress));
        prop_assert!((progress - n as f64 / 300.0).abs() < EPS);
    }

    #[test]
    fn schedule_follows_offset_formula(index in 0usize..4, repeats in 0u32..6) {
        let pattern = &alarm::catalog()[index];
        let events = alarm::schedule(pattern, repeats);
        prop_assert_eq!(events.len(), pattern.len() * repeats as usize);

        let slot = pattern.slot_duration_secs;
        for (n, event) in events.iter().enumerate() {
            let r = (n / pattern.len()) as f64;
            let i = (n % pattern.len()) as f64;
            let expected = r * (pattern.len() as f64 * slot + INTER_REPEAT_GAP_SECS) + i * slot;
            prop_assert!((event.start_offset_secs - expected).abs() < EPS);
            prop_assert!((event.stop_offset_secs - event.start_offset_secs - slot).abs() < EPS);
        }
    }
}

#[test]
fn pause_twice_equals_pause_once() {
    let mut once = SessionClock::new();
    let mut twice = SessionClock::new();
    for clock in [&mut once, &mut twice] {
        clock.start();
        clock.tick();
        clock.tick();
        clock.pause();
    }
    twice.pause();
    assert_eq!(once.status(), twice.status());
    assert_eq!(once.remaining_secs(), twice.remaining_secs());
    assert_eq!(twice.status(), ClockStatus::Idle);
}

#[test]
fn short_break_expiry_leaves_work_counter() {
    let mut clock = SessionClock::with_kind(SessionKind::ShortBreak);
    clock.start();
    for _ in 0..299 {
        clock.tick();
    }
    assert_eq!(clock.remaining_secs(), 1);
    clock.tick();
    assert!(clock.is_expired());
    assert_eq!(clock.completed_work_sessions(), 0);
}

#[test]
fn classic_alarm_repeated_three_times() {
    let sink = Arc::new(RecordingSink::new());
    let sequencer = AlarmSequencer::new(sink.clone());
    let events = sequencer.play("classic", 3);

    assert_eq!(events.len(), 9);
    assert!((events[3].start_offset_secs - (3.0 * 0.15 + 0.2)).abs() < EPS);
    assert!((events[3].start_offset_secs - 0.65).abs() < EPS);
    assert_eq!(
        events.iter().map(|e| e.frequency_hz).take(3).collect::<Vec<_>>(),
        [880.0, 1100.0, 880.0]
    );
    assert!(events.iter().all(|e| e.wave_shape == WaveShape::Sine));
    assert_eq!(sink.len(), 9);
}

#[test]
fn full_work_session_then_reset() {
    let mut clock = SessionClock::new();
    assert_eq!(clock.kind(), SessionKind::Work);
    clock.start();
    for _ in 0..1500 {
        clock.tick();
    }
    assert_eq!(clock.status(), ClockStatus::Expired);
    assert_eq!(clock.completed_work_sessions(), 1);
    assert_eq!(clock.progress_fraction(), 1.0);

    clock.reset();
    assert_eq!(clock.status(), ClockStatus::Idle);
    assert_eq!(clock.remaining_secs(), 1500);
    assert_eq!(clock.progress_fraction(), 0.0);
    assert_eq!(clock.completed_work_sessions(), 1);
}

#[test]
fn todo_completion_chimes_every_time_it_is_completed() {
    let (mut ctl, sink) = recording_controller();
    let id = match ctl.apply(Intent::AddTodo {
        text: "Write report".into(),
    }) {
        Some(Event::TodoAdded { id, text, .. }) => {
            assert_eq!(text, "Write report");
            id
        }
        other => panic!("Expected TodoAdded, got {other:?}"),
    };

    assert!(matches!(
        ctl.apply(Intent::ToggleTodo { id }),
        Some(Event::TodoCompleted { chime_tones: 3, .. })
    ));
    let first = sink.take();
    assert_eq!(first.len(), 3);
    assert!(first
        .windows(2)
        .all(|pair| pair[0].frequency_hz < pair[1].frequency_hz));

    assert!(matches!(
        ctl.apply(Intent::ToggleTodo { id }),
        Some(Event::TodoReopened { .. })
    ));
    assert!(sink.is_empty());

    ctl.apply(Intent::ToggleTodo { id });
    assert_eq!(sink.take(), first);
}

#[test]
fn todo_chime_ignores_selected_alarm() {
    let (mut ctl, sink) = recording_controller();
    ctl.apply(Intent::SelectAlarmPattern {
        id: "digital".into(),
    });
    ctl.apply(Intent::AddTodo { text: "a".into() });
    let id = ctl.todos().iter().next().map(|t| t.id).unwrap();
    ctl.apply(Intent::ToggleTodo { id });
    assert!(sink
        .requests()
        .iter()
        .all(|r| r.wave_shape == WaveShape::Sine));
}

#[test]
fn unknown_pattern_preview_is_silent() {
    let sink = Arc::new(RecordingSink::new());
    let sequencer = AlarmSequencer::new(sink.clone());
    assert!(sequencer.preview("no-such-pattern").is_empty());
    assert!(sink.is_empty());
}

#[test]
fn abandoned_work_session_is_not_counted() {
    let (mut ctl, sink) = recording_controller();
    ctl.apply(Intent::Start);
    for _ in 0..1499 {
        ctl.tick();
    }
    ctl.apply(Intent::Reset);
    assert_eq!(ctl.clock().completed_work_sessions(), 0);
    assert!(sink.is_empty());
}

#[test]
fn clock_observer_sees_controller_transitions() {
    let (mut ctl, _sink) = recording_controller();
    let names = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&names);
    ctl.clock_mut()
        .subscribe(move |event| seen.lock().unwrap().push(event.name()));

    ctl.apply(Intent::Start);
    ctl.tick();
    ctl.apply(Intent::Pause);
    ctl.apply(Intent::Pause);
    ctl.apply(Intent::SelectKind {
        kind: SessionKind::LongBreak,
    });

    assert_eq!(
        *names.lock().unwrap(),
        ["SessionStarted", "Ticked", "SessionPaused", "KindSelected"]
    );
}
