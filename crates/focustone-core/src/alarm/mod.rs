mod pattern;
mod sequencer;

pub use pattern::{
    catalog, default_pattern, find, wave_shape_for, AlarmPattern, WaveShape,
    DEFAULT_PATTERN_ID, TODO_COMPLETE,
};
pub use sequencer::{
    schedule, AlarmSequencer, ScheduledToneEvent, INTER_REPEAT_GAP_SECS, MAX_REPEAT_COUNT,
};
