//! # Focustone Core Library
//!
//! Core logic for the Focustone focus-session timer. Front ends (the CLI,
//! or anything else that renders a view) drive the engine with user intents
//! and a one-second tick, and observe the events it emits.
//!
//! ## Architecture
//!
//! - **Session Clock**: A tick-driven countdown state machine
//!   (Idle / Running / Expired) with an observer interface
//! - **Alarm Sequencer**: Computes every tone offset of a repeated alarm
//!   pattern up front and hands them to a tone sink
//! - **Audio**: Tone sinks (log, in-memory recording, and `rodio` output
//!   behind the `audio` feature)
//! - **Controller**: Maps UI intents onto the clock, the sequencer and the
//!   todo list
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionClock`]: Countdown state machine
//! - [`AlarmSequencer`]: Alarm scheduling
//! - [`FocusController`]: Intent dispatch
//! - [`Config`]: Application configuration management

pub mod alarm;
pub mod audio;
pub mod controller;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;
pub mod todo;

pub use alarm::{AlarmPattern, AlarmSequencer, ScheduledToneEvent, WaveShape};
pub use audio::{LogSink, RecordingSink, ToneRequest, ToneSink};
#[cfg(feature = "audio")]
pub use audio::RodioSink;
pub use controller::{FocusController, Intent};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use storage::Config;
pub use timer::{ClockStatus, SessionClock, SessionKind};
pub use todo::{Todo, TodoList, Toggle};
