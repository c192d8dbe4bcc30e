//! Tone emission backends.
//!
//! The alarm sequencer never produces sound itself. It hands each computed
//! tone to a [`ToneSink`], which is responsible for starting and stopping the
//! tone at the requested offsets from "now". Sinks must accept overlapping
//! requests: two alarms scheduled back to back simply play on top of each
//! other.

mod recording;
#[cfg(feature = "audio")]
mod rodio_sink;

pub use recording::RecordingSink;
#[cfg(feature = "audio")]
pub use rodio_sink::RodioSink;

use std::time::Duration;

use crate::alarm::{ScheduledToneEvent, WaveShape};

/// One tone to emit, relative to the moment the request is handed over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneRequest {
    pub frequency_hz: f64,
    pub wave_shape: WaveShape,
    pub start_offset: Duration,
    pub stop_offset: Duration,
}

impl ToneRequest {
    pub fn duration(&self) -> Duration {
        self.stop_offset.saturating_sub(self.start_offset)
    }
}

impl From<&ScheduledToneEvent> for ToneRequest {
    fn from(event: &ScheduledToneEvent) -> Self {
        Self {
            frequency_hz: event.frequency_hz,
            wave_shape: event.wave_shape,
            start_offset: secs_to_duration(event.start_offset_secs),
            stop_offset: secs_to_duration(event.stop_offset_secs),
        }
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_default()
}

/// Consumer of scheduled tones.
///
/// `emit` must return promptly; any real playback happens asynchronously.
/// Backend failures are logged by the sink, never reported to the caller.
pub trait ToneSink: Send + Sync {
    fn emit(&self, request: ToneRequest);

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Headless sink: records each tone as a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ToneSink for LogSink {
    fn emit(&self, request: ToneRequest) {
        tracing::info!(
            frequency_hz = request.frequency_hz,
            shape = ?request.wave_shape,
            start_ms = request.start_offset.as_millis() as u64,
            stop_ms = request.stop_offset.as_millis() as u64,
            "tone"
        );
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
