//! User intents -> engine.
//!
//! [`FocusController`] is what a front end talks to. It owns the session
//! clock, the alarm sequencer and the todo list, and wires the one piece of
//! coordination between them: a session expiry plays the selected alarm.
//!
//! Every intent is fire-and-forget. Disallowed intents (starting an expired
//! session, toggling a todo that does not exist, selecting an unknown alarm)
//! do nothing and return `None`.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alarm::{self, AlarmSequencer, ScheduledToneEvent, TODO_COMPLETE};
use crate::audio::ToneSink;
use crate::events::Event;
use crate::storage::Config;
use crate::timer::{SessionClock, SessionKind};
use crate::todo::{TodoList, Toggle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Start,
    Pause,
    Reset,
    SelectKind { kind: SessionKind },
    AddTodo { text: String },
    ToggleTodo { id: Uuid },
    DeleteTodo { id: Uuid },
    SelectAlarmPattern { id: String },
    PreviewAlarm { id: String },
}

#[derive(Debug)]
pub struct FocusController {
    clock: SessionClock,
    sequencer: AlarmSequencer,
    todos: TodoList,
    alarm_pattern: &'static str,
    repeat_count: u32,
    sounds_enabled: bool,
    todo_chime: bool,
}

impl FocusController {
    /// Default settings: work session, `classic` alarm played three times.
    pub fn new(sink: Arc<dyn ToneSink>) -> Self {
        Self::from_config(&Config::default(), sink)
    }

    pub fn from_config(config: &Config, sink: Arc<dyn ToneSink>) -> Self {
        let alarm_pattern = match alarm::find(&config.alarm.pattern) {
            Some(pattern) => pattern.id,
            None => {
                let fallback = alarm::default_pattern().id;
                tracing::warn!(
                    pattern = %config.alarm.pattern,
                    "unknown alarm pattern in config, using {fallback}"
                );
                fallback
            }
        };
        let repeat_count = config.alarm.repeat_count.clamp(1, alarm::MAX_REPEAT_COUNT);
        if repeat_count != config.alarm.repeat_count {
            tracing::warn!(
                requested = config.alarm.repeat_count,
                "alarm repeat count out of range, using {repeat_count}"
            );
        }
        tracing::debug!(sink = sink.name(), alarm_pattern, "controller ready");

        Self {
            clock: SessionClock::with_kind(config.session.default_kind),
            sequencer: AlarmSequencer::new(sink),
            todos: TodoList::new(),
            alarm_pattern,
            repeat_count,
            sounds_enabled: config.sounds.enabled,
            todo_chime: config.sounds.todo_chime,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Mutable access, e.g. to subscribe to clock transitions.
    pub fn clock_mut(&mut self) -> &mut SessionClock {
        &mut self.clock
    }

    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub fn sequencer(&self) -> &AlarmSequencer {
        &self.sequencer
    }

    pub fn alarm_pattern(&self) -> &'static str {
        self.alarm_pattern
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn snapshot(&self) -> Event {
        self.clock.snapshot()
    }

    // ── Intents ──────────────────────────────────────────────────────

    pub fn apply(&mut self, intent: Intent) -> Option<Event> {
        match intent {
            Intent::Start => self.clock.start(),
            Intent::Pause => self.clock.pause(),
            Intent::Reset => self.clock.reset(),
            Intent::SelectKind { kind } => self.clock.select_kind(kind),
            Intent::AddTodo { text } => self.add_todo(&text),
            Intent::ToggleTodo { id } => self.toggle_todo(id),
            Intent::DeleteTodo { id } => self.delete_todo(id),
            Intent::SelectAlarmPattern { id } => self.select_alarm_pattern(&id),
            Intent::PreviewAlarm { id } => self.preview_alarm(&id),
        }
    }

    /// One-second tick from the periodic source. On expiry the selected
    /// alarm is scheduled; an alarm already handed to the sink keeps
    /// playing whatever happens to the clock afterwards.
    pub fn tick(&mut self) -> Vec<Event> {
        let Some(event) = self.clock.tick() else {
            return Vec::new();
        };
        let expired = matches!(event, Event::SessionExpired { .. });
        let mut events = vec![event];
        if expired && self.sounds_enabled {
            let tones = self.sequencer.play(self.alarm_pattern, self.repeat_count);
            events.push(Event::AlarmScheduled {
                pattern_id: self.alarm_pattern.to_string(),
                repeat_count: self.repeat_count,
                tone_count: tones.len(),
                at: Utc::now(),
            });
        }
        events
    }

    fn add_todo(&mut self, text: &str) -> Option<Event> {
        let id = self.todos.add(text)?;
        let text = self.todos.get(id).map(|t| t.text.clone()).unwrap_or_default();
        Some(Event::TodoAdded {
            id,
            text,
            at: Utc::now(),
        })
    }

    fn toggle_todo(&mut self, id: Uuid) -> Option<Event> {
        match self.todos.toggle(id) {
            Toggle::Completed => {
                let chime_tones = self.play_todo_chime().len();
                Some(Event::TodoCompleted {
                    id,
                    chime_tones,
                    at: Utc::now(),
                })
            }
            Toggle::Reopened => Some(Event::TodoReopened { id, at: Utc::now() }),
            Toggle::NotFound => None,
        }
    }

    fn delete_todo(&mut self, id: Uuid) -> Option<Event> {
        self.todos
            .delete(id)
            .then(|| Event::TodoDeleted { id, at: Utc::now() })
    }

    fn select_alarm_pattern(&mut self, id: &str) -> Option<Event> {
        let Some(pattern) = alarm::find(id) else {
            tracing::warn!(pattern_id = id, "ignoring unknown alarm pattern");
            return None;
        };
        self.alarm_pattern = pattern.id;
        Some(Event::AlarmPatternSelected {
            pattern_id: pattern.id.to_string(),
            at: Utc::now(),
        })
    }

    fn preview_alarm(&mut self, id: &str) -> Option<Event> {
        let tones = self.sequencer.preview(id);
        if tones.is_empty() {
            return None;
        }
        Some(Event::AlarmPreviewed {
            pattern_id: id.to_string(),
            tone_count: tones.len(),
            at: Utc::now(),
        })
    }

    fn play_todo_chime(&self) -> Vec<ScheduledToneEvent> {
        if !(self.sounds_enabled && self.todo_chime) {
            return Vec::new();
        }
        self.sequencer.chime(&TODO_COMPLETE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::timer::ClockStatus;

    fn controller() -> (FocusController, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        (FocusController::new(sink.clone()), sink)
    }

    fn expire(ctl: &mut FocusController) -> Vec<Event> {
        ctl.apply(Intent::Start);
        let mut events = Vec::new();
        while !ctl.clock().is_expired() {
            events.extend(ctl.tick());
        }
        events
    }

    #[test]
    fn expiry_plays_selected_alarm() {
        let (mut ctl, sink) = controller();
        ctl.apply(Intent::SelectKind {
            kind: SessionKind::ShortBreak,
        });
        let events = expire(&mut ctl);
        assert!(matches!(
            events.last(),
            Some(Event::AlarmScheduled { tone_count: 9, .. })
        ));
        assert_eq!(sink.len(), 9);
    }

    #[test]
    fn ticks_after_expiry_do_not_replay() {
        let (mut ctl, sink) = controller();
        ctl.apply(Intent::SelectKind {
            kind: SessionKind::ShortBreak,
        });
        expire(&mut ctl);
        assert!(ctl.tick().is_empty());
        assert_eq!(sink.len(), 9);
    }

    #[test]
    fn reset_after_expiry_keeps_scheduled_alarm() {
        let (mut ctl, sink) = controller();
        ctl.apply(Intent::SelectKind {
            kind: SessionKind::ShortBreak,
        });
        expire(&mut ctl);
        ctl.apply(Intent::Reset);
        assert_eq!(ctl.clock().status(), ClockStatus::Idle);
        assert_eq!(sink.len(), 9);
    }

    #[test]
    fn select_alarm_pattern_changes_expiry_sound() {
        let (mut ctl, sink) = controller();
        assert!(ctl
            .apply(Intent::SelectAlarmPattern { id: "digital".into() })
            .is_some());
        assert!(ctl
            .apply(Intent::SelectAlarmPattern { id: "foghorn".into() })
            .is_none());
        assert_eq!(ctl.alarm_pattern(), "digital");

        ctl.apply(Intent::SelectKind {
            kind: SessionKind::ShortBreak,
        });
        expire(&mut ctl);
        assert_eq!(sink.len(), 4 * 3);
    }

    #[test]
    fn preview_does_not_touch_clock() {
        let (mut ctl, sink) = controller();
        ctl.apply(Intent::Start);
        ctl.tick();
        assert!(ctl
            .apply(Intent::PreviewAlarm { id: "gentle".into() })
            .is_some());
        assert!(ctl.clock().is_running());
        assert_eq!(ctl.clock().remaining_secs(), 1499);
        assert_eq!(sink.len(), 3);
        assert!(ctl
            .apply(Intent::PreviewAlarm { id: "foghorn".into() })
            .is_none());
    }

    #[test]
    fn muted_config_schedules_nothing() {
        let mut config = Config::default();
        config.sounds.enabled = false;
        config.session.default_kind = SessionKind::ShortBreak;
        let sink = Arc::new(RecordingSink::new());
        let mut ctl = FocusController::from_config(&config, sink.clone());

        let events = expire(&mut ctl);
        assert!(matches!(events.last(), Some(Event::SessionExpired { .. })));
        let id = match ctl.apply(Intent::AddTodo { text: "x".into() }) {
            Some(Event::TodoAdded { id, .. }) => id,
            other => panic!("Expected TodoAdded, got {other:?}"),
        };
        assert!(matches!(
            ctl.apply(Intent::ToggleTodo { id }),
            Some(Event::TodoCompleted { chime_tones: 0, .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn unknown_config_pattern_falls_back() {
        let mut config = Config::default();
        config.alarm.pattern = "foghorn".into();
        let ctl = FocusController::from_config(&config, Arc::new(RecordingSink::new()));
        assert_eq!(ctl.alarm_pattern(), alarm::DEFAULT_PATTERN_ID);
    }

    #[test]
    fn out_of_range_repeat_count_is_clamped() {
        let mut config = Config::default();
        config.session.default_kind = SessionKind::ShortBreak;
        config.alarm.repeat_count = 4_000_000_000;
        let sink = Arc::new(RecordingSink::new());
        let mut ctl = FocusController::from_config(&config, sink.clone());
        assert_eq!(ctl.repeat_count(), alarm::MAX_REPEAT_COUNT);

        ctl.apply(Intent::Start);
        for _ in 0..300 {
            ctl.tick();
        }
        assert!(ctl.clock().is_expired());
        assert_eq!(sink.len(), 3 * alarm::MAX_REPEAT_COUNT as usize);

        config.alarm.repeat_count = 0;
        let ctl = FocusController::from_config(&config, Arc::new(RecordingSink::new()));
        assert_eq!(ctl.repeat_count(), 1);
    }

    #[test]
    fn blank_todo_is_declined() {
        let (mut ctl, _) = controller();
        assert!(ctl.apply(Intent::AddTodo { text: "  ".into() }).is_none());
        assert!(ctl.todos().is_empty());
    }

    #[test]
    fn intents_parse_from_json() {
        let intent: Intent =
            serde_json::from_str(r#"{"intent":"select_kind","kind":"long_break"}"#).unwrap();
        assert_eq!(
            intent,
            Intent::SelectKind {
                kind: SessionKind::LongBreak
            }
        );
    }
}
