use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{JiggleState, TimerKind};

/// What caused a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Toggle, start or stop issued by the user (or the launch flag).
    Manual,
    /// The time-window gate pulled the state toward its verdict.
    Automatic,
}

/// Every state change in the engine produces an Event.
/// The presenter gets callbacks; the CLI prints or logs these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    JiggleStarted {
        trigger: Trigger,
        period_secs: u32,
        at: DateTime<Utc>,
    },
    JiggleStopped {
        trigger: Trigger,
        at: DateTime<Utc>,
    },
    /// A movement was handed to the sink and accepted.
    Jiggled {
        dx: i32,
        dy: i32,
        at: DateTime<Utc>,
    },
    /// The sink reported it could not enqueue the movement.
    JiggleFailed {
        dx: i32,
        dy: i32,
        at: DateTime<Utc>,
    },
    /// A timer request was refused by the presenter.
    TimerRejected {
        kind: TimerKind,
        reason: String,
        at: DateTime<Utc>,
    },
    ConfigChanged {
        period_secs: u32,
        zen_mode: bool,
        restriction_enabled: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: JiggleState,
        period_secs: u32,
        zen_mode: bool,
        restriction_enabled: bool,
        tooltip: String,
        at: DateTime<Utc>,
    },
}
