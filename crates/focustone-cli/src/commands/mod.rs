pub mod alarm;
pub mod config;
pub mod session;

use std::sync::Arc;

use focustone_core::{Config, ToneSink};

/// Tone output for this build: the audio device when compiled with the
/// `audio` feature, log lines otherwise.
pub fn tone_sink(config: &Config) -> Arc<dyn ToneSink> {
    #[cfg(feature = "audio")]
    {
        Arc::new(focustone_core::RodioSink::new(config.volume_gain()))
    }
    #[cfg(not(feature = "audio"))]
    {
        tracing::debug!(volume = config.alarm.volume, "built without audio, logging tones");
        Arc::new(focustone_core::LogSink)
    }
}
