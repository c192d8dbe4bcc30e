//! Built-in alarm patterns.
//!
//! Patterns are static configuration: there is no way to define new ones at
//! runtime. Lookups by id go through [`find`], which returns `None` for ids
//! that are not in the catalog.

use serde::Serialize;

/// Oscillator shape used to render a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveShape {
    Sine,
    Square,
}

/// A named sequence of tones sharing one slot length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlarmPattern {
    pub id: &'static str,
    pub display_name: &'static str,
    pub frequencies_hz: &'static [f64],
    pub slot_duration_secs: f64,
}

impl AlarmPattern {
    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }

    /// Length of one pass through the pattern, without any gap.
    pub fn pass_duration_secs(&self) -> f64 {
        self.len() as f64 * self.slot_duration_secs
    }

    pub fn wave_shape(&self) -> WaveShape {
        wave_shape_for(self.id)
    }
}

pub const DEFAULT_PATTERN_ID: &str = "classic";

/// Id of the one pattern rendered with a square wave.
const HARSH_PATTERN_ID: &str = "digital";

const CATALOG: &[AlarmPattern] = &[
    AlarmPattern {
        id: "classic",
        display_name: "Classic",
        frequencies_hz: &[880.0, 1100.0, 880.0],
        slot_duration_secs: 0.15,
    },
    AlarmPattern {
        id: "digital",
        display_name: "Digital",
        frequencies_hz: &[1200.0, 1200.0, 1200.0, 1200.0],
        slot_duration_secs: 0.1,
    },
    AlarmPattern {
        id: "chime",
        display_name: "Chime",
        frequencies_hz: &[523.25, 659.25, 783.99, 1046.5],
        slot_duration_secs: 0.2,
    },
    AlarmPattern {
        id: "gentle",
        display_name: "Gentle",
        frequencies_hz: &[440.0, 554.37, 659.25],
        slot_duration_secs: 0.3,
    },
];

/// Ascending C-E-G played when a todo is checked off. Not selectable as an
/// alarm.
pub const TODO_COMPLETE: AlarmPattern = AlarmPattern {
    id: "todo-complete",
    display_name: "Todo Complete",
    frequencies_hz: &[523.25, 659.25, 783.99],
    slot_duration_secs: 0.1,
};

pub fn catalog() -> &'static [AlarmPattern] {
    CATALOG
}

pub fn find(id: &str) -> Option<&'static AlarmPattern> {
    CATALOG.iter().find(|p| p.id == id)
}

pub fn default_pattern() -> &'static AlarmPattern {
    &CATALOG[0]
}

pub fn wave_shape_for(pattern_id: &str) -> WaveShape {
    if pattern_id == HARSH_PATTERN_ID {
        WaveShape::Square
    } else {
        WaveShape::Sine
    }
}
