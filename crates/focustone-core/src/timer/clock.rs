//! Session clock implementation.
//!
//! The clock is a tick-driven state machine. It does not use internal
//! threads or read the wall clock - the caller is responsible for calling
//! `tick()` once per second while the clock is running.
//!
//! ## State Transitions
//!
//! ```text
//!          start (remaining > 0)          tick (remaining -> 0)
//!   Idle ───────────────────────► Running ─────────────────────► Expired
//!    ▲                               │                             │
//!    │   pause / reset / select_kind │                             │
//!    └───────────────────────────────┘                             │
//!    │                       reset / select_kind                   │
//!    └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut clock = SessionClock::new();
//! clock.subscribe(|event| println!("{}", event.name()));
//! clock.start();
//! // Once per second:
//! clock.tick(); // Returns Some(Event::SessionExpired { .. }) on expiry
//! ```

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::session::SessionKind;
use crate::events::Event;

/// Work sessions per cycle before a long break is due.
pub const CYCLE_LENGTH: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStatus {
    /// Not counting: freshly created, paused, reset or switched.
    Idle,
    Running,
    /// Remaining time hit zero while running.
    Expired,
}

/// Handle returned by [`SessionClock::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Event) + Send>;

/// Countdown state machine for a single focus session.
pub struct SessionClock {
    kind: SessionKind,
    status: ClockStatus,
    remaining_secs: u64,
    completed_work_sessions: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl SessionClock {
    /// Idle work session at full length.
    pub fn new() -> Self {
        Self::with_kind(SessionKind::Work)
    }

    pub fn with_kind(kind: SessionKind) -> Self {
        Self {
            kind,
            status: ClockStatus::Idle,
            remaining_secs: kind.duration_secs(),
            completed_work_sessions: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn status(&self) -> ClockStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.kind.duration_secs()
    }

    pub fn completed_work_sessions(&self) -> u64 {
        self.completed_work_sessions
    }

    pub fn is_running(&self) -> bool {
        self.status == ClockStatus::Running
    }

    pub fn is_expired(&self) -> bool {
        self.status == ClockStatus::Expired
    }

    /// 0.0 at full duration, 1.0 at expiry.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.duration_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Remaining time as zero-padded `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }

    /// Position (1-based) of the current work session within the repeating
    /// four-session cycle.
    pub fn cycle_position(&self) -> u64 {
        self.completed_work_sessions % CYCLE_LENGTH + 1
    }

    pub fn sessions_until_long_break(&self) -> u64 {
        CYCLE_LENGTH - self.completed_work_sessions % CYCLE_LENGTH
    }

    /// Which kind the user would normally pick next. Breaks are followed
    /// by work; work is followed by a long break once per cycle.
    pub fn suggested_next_kind(&self) -> SessionKind {
        if self.kind.is_break() {
            return SessionKind::Work;
        }
        // Count the current session as done if it hasn't expired yet.
        let done = if self.is_expired() {
            self.completed_work_sessions
        } else {
            self.completed_work_sessions + 1
        };
        if done % CYCLE_LENGTH == 0 {
            SessionKind::LongBreak
        } else {
            SessionKind::ShortBreak
        }
    }

    /// Build a full state snapshot event. Not broadcast to subscribers.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            kind: self.kind,
            status: self.status,
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs(),
            display: self.format_remaining(),
            progress: self.progress_fraction(),
            completed_work_sessions: self.completed_work_sessions,
            cycle_position: self.cycle_position(),
            at: Utc::now(),
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Register a callback invoked on every state transition.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.status == ClockStatus::Running || self.remaining_secs == 0 {
            return None;
        }
        self.status = ClockStatus::Running;
        tracing::debug!(kind = self.kind.id(), remaining = self.remaining_secs, "session started");
        self.emit(Event::SessionStarted {
            kind: self.kind,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.status != ClockStatus::Running {
            return None;
        }
        self.status = ClockStatus::Idle;
        tracing::debug!(kind = self.kind.id(), remaining = self.remaining_secs, "session paused");
        self.emit(Event::SessionPaused {
            kind: self.kind,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Back to full duration, idle. An abandoned work session is not
    /// counted as completed. Resetting a clock that is already idle at full
    /// duration does nothing.
    pub fn reset(&mut self) -> Option<Event> {
        if self.is_pristine() {
            return None;
        }
        let from = self.status;
        self.status = ClockStatus::Idle;
        self.remaining_secs = self.duration_secs();
        tracing::debug!(kind = self.kind.id(), ?from, "session reset");
        self.emit(Event::SessionReset {
            kind: self.kind,
            from,
            at: Utc::now(),
        })
    }

    /// Switch session kind. Stops a running session. Selecting the current
    /// kind on an idle clock at full duration does nothing.
    pub fn select_kind(&mut self, kind: SessionKind) -> Option<Event> {
        if kind == self.kind && self.is_pristine() {
            return None;
        }
        self.kind = kind;
        self.status = ClockStatus::Idle;
        self.remaining_secs = kind.duration_secs();
        tracing::debug!(kind = kind.id(), "session kind selected");
        self.emit(Event::KindSelected {
            kind,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance by one second. Returns `Some(Event::SessionExpired)` on the
    /// tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.status != ClockStatus::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return self.emit(Event::Ticked {
                remaining_secs: self.remaining_secs,
                progress: self.progress_fraction(),
                at: Utc::now(),
            });
        }

        self.status = ClockStatus::Expired;
        if self.kind == SessionKind::Work {
            self.completed_work_sessions += 1;
        }
        tracing::info!(
            kind = self.kind.id(),
            completed_work_sessions = self.completed_work_sessions,
            "session expired"
        );
        self.emit(Event::SessionExpired {
            kind: self.kind,
            completed_work_sessions: self.completed_work_sessions,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn is_pristine(&self) -> bool {
        self.status == ClockStatus::Idle && self.remaining_secs == self.duration_secs()
    }

    fn emit(&mut self, event: Event) -> Option<Event> {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
        Some(event)
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClock")
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("remaining_secs", &self.remaining_secs)
            .field("completed_work_sessions", &self.completed_work_sessions)
            .field("observers", &self.observers.len())
            .finish()
    }
}

pub fn format_mm_ss(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
