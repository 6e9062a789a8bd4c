//! Callbacks the engine issues to the presentation layer.
//!
//! The engine owns no timers. It asks the presenter to arm or cancel them and
//! to refresh whatever shows the active/inactive indicator; the presenter
//! calls back into the engine when a timer fires.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::JiggleState;
use crate::error::ScheduleError;

/// Fixed interval of the gate-poll timer.
pub const GATE_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Fires every `period_secs` while jiggling.
    Period,
    /// Fires every second while the time restriction is enabled.
    GatePoll,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::Period => write!(f, "period"),
            TimerKind::GatePoll => write!(f, "gate-poll"),
        }
    }
}

pub trait Presenter {
    /// Arms (or re-arms) the timer. Must take effect before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] when the timer cannot be armed.
    fn request_timer_start(&mut self, kind: TimerKind, interval_ms: u64) -> Result<(), ScheduleError>;

    /// Cancels the timer. No tick of `kind` may be delivered afterwards.
    fn request_timer_stop(&mut self, kind: TimerKind);

    fn notify_state_changed(&mut self, state: JiggleState);

    fn notify_tooltip_text_changed(&mut self, text: &str);
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn request_timer_start(&mut self, kind: TimerKind, interval_ms: u64) -> Result<(), ScheduleError> {
        (**self).request_timer_start(kind, interval_ms)
    }

    fn request_timer_stop(&mut self, kind: TimerKind) {
        (**self).request_timer_stop(kind)
    }

    fn notify_state_changed(&mut self, state: JiggleState) {
        (**self).notify_state_changed(state)
    }

    fn notify_tooltip_text_changed(&mut self, text: &str) {
        (**self).notify_tooltip_text_changed(text)
    }
}
