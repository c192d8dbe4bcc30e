use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::{ClockStatus, SessionKind};

/// Every state change in the engine produces an Event.
/// Clock subscribers receive them as they happen; the controller returns
/// them to whoever issued the intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        kind: SessionKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        kind: SessionKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        kind: SessionKind,
        /// Status the clock was in before the reset.
        from: ClockStatus,
        at: DateTime<Utc>,
    },
    KindSelected {
        kind: SessionKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    /// Remaining time reached zero while running. Fired once per expiry.
    SessionExpired {
        kind: SessionKind,
        completed_work_sessions: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        kind: SessionKind,
        status: ClockStatus,
        remaining_secs: u64,
        duration_secs: u64,
        display: String,
        progress: f64,
        completed_work_sessions: u64,
        cycle_position: u64,
        at: DateTime<Utc>,
    },
    AlarmScheduled {
        pattern_id: String,
        repeat_count: u32,
        tone_count: usize,
        at: DateTime<Utc>,
    },
    AlarmPreviewed {
        pattern_id: String,
        tone_count: usize,
        at: DateTime<Utc>,
    },
    AlarmPatternSelected {
        pattern_id: String,
        at: DateTime<Utc>,
    },
    TodoAdded {
        id: Uuid,
        text: String,
        at: DateTime<Utc>,
    },
    TodoCompleted {
        id: Uuid,
        /// Number of chime tones handed to the tone sink (0 when muted).
        chime_tones: usize,
        at: DateTime<Utc>,
    },
    TodoReopened {
        id: Uuid,
        at: DateTime<Utc>,
    },
    TodoDeleted {
        id: Uuid,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine-readable name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "SessionStarted",
            Event::SessionPaused { .. } => "SessionPaused",
            Event::SessionReset { .. } => "SessionReset",
            Event::KindSelected { .. } => "KindSelected",
            Event::Ticked { .. } => "Ticked",
            Event::SessionExpired { .. } => "SessionExpired",
            Event::StateSnapshot { .. } => "StateSnapshot",
            Event::AlarmScheduled { .. } => "AlarmScheduled",
            Event::AlarmPreviewed { .. } => "AlarmPreviewed",
            Event::AlarmPatternSelected { .. } => "AlarmPatternSelected",
            Event::TodoAdded { .. } => "TodoAdded",
            Event::TodoCompleted { .. } => "TodoCompleted",
            Event::TodoReopened { .. } => "TodoReopened",
            Event::TodoDeleted { .. } => "TodoDeleted",
        }
    }
}
