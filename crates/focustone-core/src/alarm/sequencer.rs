//! Alarm sequencer.
//!
//! Turns a pattern and a repeat count into the complete list of tone events
//! up front, then hands every event to the tone sink. Offsets for repeat `r`
//! and tone `i` are
//!
//! ```text
//! start = r * (len * slot + INTER_REPEAT_GAP_SECS) + i * slot
//! stop  = start + slot
//! ```
//!
//! The sequencer keeps no timeline between calls, so overlapping calls
//! produce independent tone streams. Repeat counts above
//! [`MAX_REPEAT_COUNT`] are capped.

use std::sync::Arc;

use serde::Serialize;

use super::pattern::{self, AlarmPattern, WaveShape};
use crate::audio::{ToneRequest, ToneSink};

/// Silence inserted after each full pass of a repeated pattern.
pub const INTER_REPEAT_GAP_SECS: f64 = 0.2;

/// Most passes a single call will schedule.
pub const MAX_REPEAT_COUNT: u32 = 20;

/// One tone, relative to the start of the call that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledToneEvent {
    pub start_offset_secs: f64,
    pub stop_offset_secs: f64,
    pub frequency_hz: f64,
    pub wave_shape: WaveShape,
}

/// Compute the events for `repeat_count` passes of `pattern`, at most
/// [`MAX_REPEAT_COUNT`].
pub fn schedule(pattern: &AlarmPattern, repeat_count: u32) -> Vec<ScheduledToneEvent> {
    let repeat_count = repeat_count.min(MAX_REPEAT_COUNT);
    let slot = pattern.slot_duration_secs;
    let stride = pattern.pass_duration_secs() + INTER_REPEAT_GAP_SECS;
    let wave_shape = pattern.wave_shape();

    let mut events = Vec::with_capacity(pattern.len() * repeat_count as usize);
    for r in 0..repeat_count {
        for (i, &frequency_hz) in pattern.frequencies_hz.iter().enumerate() {
            let start_offset_secs = r as f64 * stride + i as f64 * slot;
            events.push(ScheduledToneEvent {
                start_offset_secs,
                stop_offset_secs: start_offset_secs + slot,
                frequency_hz,
                wave_shape,
            });
        }
    }
    events
}

/// Schedules alarm patterns onto a tone sink.
#[derive(Clone)]
pub struct AlarmSequencer {
    sink: Arc<dyn ToneSink>,
}

impl AlarmSequencer {
    pub fn new(sink: Arc<dyn ToneSink>) -> Self {
        Self { sink }
    }

    /// Play a catalog pattern `repeat_count` times. Unknown ids are logged
    /// and schedule nothing.
    pub fn play(&self, pattern_id: &str, repeat_count: u32) -> Vec<ScheduledToneEvent> {
        let Some(pattern) = pattern::find(pattern_id) else {
            tracing::warn!(pattern_id, "unknown alarm pattern, nothing to play");
            return Vec::new();
        };
        if repeat_count > MAX_REPEAT_COUNT {
            tracing::warn!(repeat_count, "repeat count capped at {MAX_REPEAT_COUNT}");
        }
        tracing::info!(pattern_id, repeat_count, "scheduling alarm");
        self.submit(pattern, repeat_count)
    }

    /// Play a catalog pattern once, e.g. to audition it.
    pub fn preview(&self, pattern_id: &str) -> Vec<ScheduledToneEvent> {
        let Some(pattern) = pattern::find(pattern_id) else {
            tracing::warn!(pattern_id, "unknown alarm pattern, nothing to preview");
            return Vec::new();
        };
        tracing::debug!(pattern_id, "previewing alarm");
        self.submit(pattern, 1)
    }

    /// Single-shot emission of a pattern that is not in the catalog.
    pub fn chime(&self, pattern: &AlarmPattern) -> Vec<ScheduledToneEvent> {
        tracing::debug!(pattern_id = pattern.id, "chime");
        self.submit(pattern, 1)
    }

    fn submit(&self, pattern: &AlarmPattern, repeat_count: u32) -> Vec<ScheduledToneEvent> {
        let events = schedule(pattern, repeat_count);
        for event in &events {
            self.sink.emit(ToneRequest::from(event));
        }
        events
    }
}

impl std::fmt::Debug for AlarmSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmSequencer")
            .field("sink", &self.sink.name())
            .finish()
    }
}
