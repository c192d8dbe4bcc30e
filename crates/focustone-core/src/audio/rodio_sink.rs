//! Tone output through the default audio device.
//!
//! `rodio` output streams are not `Send`, so the stream lives on a dedicated
//! thread that is spawned on the first emitted tone. Requests reach it over
//! a channel and are mixed by the stream, which lets overlapping alarms
//! play at the same time.

use std::f32::consts::PI;
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, Source};

use super::{ToneRequest, ToneSink};
use crate::alarm::WaveShape;
use crate::error::CoreError;

const SAMPLE_RATE: u32 = 44_100;

pub struct RodioSink {
    tx: Mutex<Option<Sender<ToneRequest>>>,
    volume: f32,
}

impl RodioSink {
    /// `volume` is clamped to 0.0..=1.0.
    pub fn new(volume: f32) -> Self {
        Self {
            tx: Mutex::new(None),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<ToneRequest>, CoreError> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|e| CoreError::Audio(e.to_string()))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<ToneRequest>();
        let volume = self.volume;

        thread::Builder::new()
            .name("tone-output".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!("failed to open audio output stream: {e}");
                        return;
                    }
                };

                while let Ok(request) = rx.recv() {
                    let mut tone = Oscillator::new(request.frequency_hz as f32, request.wave_shape)
                        .take_duration(request.duration());
                    tone.set_filter_fadeout();
                    let source = tone.delay(request.start_offset).amplify(volume);
                    if let Err(e) = handle.play_raw(source) {
                        tracing::warn!("failed to play tone: {e}");
                    }
                }
            })
            .map_err(CoreError::Io)?;

        *guard = Some(tx.clone());
        Ok(tx)
    }
}

impl ToneSink for RodioSink {
    fn emit(&self, request: ToneRequest) {
        let sent = self
            .ensure_thread()
            .and_then(|tx| tx.send(request).map_err(|e| CoreError::Audio(e.to_string())));
        if let Err(e) = sent {
            tracing::warn!("dropping tone at {} Hz: {e}", request.frequency_hz);
            // Let the next request try to bring the device back.
            if let Ok(mut guard) = self.tx.lock() {
                *guard = None;
            }
        }
    }

    fn name(&self) -> &'static str {
        "rodio"
    }
}

/// Endless mono oscillator; callers bound it with `take_duration`.
struct Oscillator {
    frequency: f32,
    shape: WaveShape,
    num_sample: u64,
}

impl Oscillator {
    fn new(frequency: f32, shape: WaveShape) -> Self {
        Self {
            frequency,
            shape,
            num_sample: 0,
        }
    }
}

impl Iterator for Oscillator {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        self.num_sample = self.num_sample.wrapping_add(1);

        let phase = (2.0 * PI * self.frequency * t).sin();
        let sample = match self.shape {
            WaveShape::Sine => phase,
            WaveShape::Square => phase.signum(),
        };
        // Square waves are much louder at the same amplitude.
        let gain = match self.shape {
            WaveShape::Sine => 0.3,
            WaveShape::Square => 0.12,
        };
        Some(sample * gain)
    }
}

impl Source for Oscillator {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
