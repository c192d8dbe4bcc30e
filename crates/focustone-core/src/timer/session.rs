use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    pub const ALL: [SessionKind; 3] = [
        SessionKind::Work,
        SessionKind::ShortBreak,
        SessionKind::LongBreak,
    ];

    /// Canonical length of a session of this kind, in seconds.
    pub fn duration_secs(self) -> u64 {
        match self {
            SessionKind::Work => 25 * 60,
            SessionKind::ShortBreak => 5 * 60,
            SessionKind::LongBreak => 15 * 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::ShortBreak => "Short Break",
            SessionKind::LongBreak => "Long Break",
        }
    }

    /// Stable identifier used in config files and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            SessionKind::Work => "work",
            SessionKind::ShortBreak => "short_break",
            SessionKind::LongBreak => "long_break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, SessionKind::Work)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSessionKind(pub String);

impl fmt::Display for UnknownSessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown session kind '{}' (expected work, short_break or long_break)",
            self.0
        )
    }
}

impl std::error::Error for UnknownSessionKind {}

impl FromStr for SessionKind {
    type Err = UnknownSessionKind;

    /// Accepts ids (`short_break`), kebab-case (`short-break`) and labels
    /// (`Short Break`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        SessionKind::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| UnknownSessionKind(s.to_string()))
    }
}
