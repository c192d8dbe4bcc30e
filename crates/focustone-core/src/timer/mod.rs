mod clock;
mod session;

pub use clock::{format_mm_ss, ClockStatus, SessionClock, SubscriptionId, CYCLE_LENGTH};
pub use session::{SessionKind, UnknownSessionKind};
