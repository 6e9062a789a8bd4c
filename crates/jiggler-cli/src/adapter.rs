//! Tokio-backed presentation adapter.
//!
//! Owns the two timers the engine asks for and turns state and tooltip
//! notifications into console output. The engine stays synchronous; the run
//! loop awaits [`TokioPresenter::next_tick`] and calls the matching handler.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use jiggler_core::{JiggleState, Presenter, ScheduleError, TimerKind};

#[derive(Debug)]
pub struct TokioPresenter {
    period: Option<Interval>,
    gate_poll: Option<Interval>,
    /// Suppresses console output; notifications are still logged.
    quiet: bool,
}

impl TokioPresenter {
    pub fn new(quiet: bool) -> Self {
        Self {
            period: None,
            gate_poll: None,
            quiet,
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slot(kind).is_some()
    }

    fn slot(&self, kind: TimerKind) -> &Option<Interval> {
        match kind {
            TimerKind::Period => &self.period,
            TimerKind::GatePoll => &self.gate_poll,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut Option<Interval> {
        match kind {
            TimerKind::Period => &mut self.period,
            TimerKind::GatePoll => &mut self.gate_poll,
        }
    }

    /// Resolves when an armed timer fires. Pending forever while none is.
    ///
    /// Cancel safe: dropping the future loses no tick.
    pub async fn next_tick(&mut self) -> TimerKind {
        match (self.period.as_mut(), self.gate_poll.as_mut()) {
            (Some(period), Some(gate_poll)) => tokio::select! {
                _ = period.tick() => TimerKind::Period,
                _ = gate_poll.tick() => TimerKind::GatePoll,
            },
            (Some(period), None) => {
                period.tick().await;
                TimerKind::Period
            }
            (None, Some(gate_poll)) => {
                gate_poll.tick().await;
                TimerKind::GatePoll
            }
            (None, None) => std::future::pending().await,
        }
    }

    fn print(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }
}

impl Presenter for TokioPresenter {
    fn request_timer_start(&mut self, kind: TimerKind, interval_ms: u64) -> Result<(), ScheduleError> {
        if interval_ms == 0 {
            return Err(ScheduleError::rejected(kind, "interval must be positive"));
        }

        let every = Duration::from_millis(interval_ms);
        // First tick one full interval from now, not immediately.
        let mut timer = interval_at(Instant::now() + every, every);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Re-arming replaces the previous timer.
        *self.slot_mut(kind) = Some(timer);
        debug!(%kind, interval_ms, "timer armed");
        Ok(())
    }

    fn request_timer_stop(&mut self, kind: TimerKind) {
        if self.slot_mut(kind).take().is_some() {
            debug!(%kind, "timer cancelled");
        }
    }

    fn notify_state_changed(&mut self, state: JiggleState) {
        info!(?state, "state changed");
        let label = match state {
            JiggleState::Idle => "idle",
            JiggleState::Active => "jiggling",
        };
        self.print(&format!("[{label}]"));
    }

    fn notify_tooltip_text_changed(&mut self, text: &str) {
        debug!(text, "tooltip changed");
        self.print(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn period_timer_fires_after_one_interval() {
        let mut presenter = TokioPresenter::new(true);
        presenter.request_timer_start(TimerKind::Period, 30_000).unwrap();

        let started = Instant::now();
        assert_eq!(presenter.next_tick().await, TimerKind::Period);
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn gate_poll_fires_first_when_shorter() {
        let mut presenter = TokioPresenter::new(true);
        presenter.request_timer_start(TimerKind::Period, 60_000).unwrap();
        presenter.request_timer_start(TimerKind::GatePoll, 1_000).unwrap();
        assert_eq!(presenter.next_tick().await, TimerKind::GatePoll);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_disarms() {
        let mut presenter = TokioPresenter::new(true);
        presenter.request_timer_start(TimerKind::Period, 1_000).unwrap();
        presenter.request_timer_start(TimerKind::GatePoll, 5_000).unwrap();
        presenter.request_timer_stop(TimerKind::Period);

        assert!(!presenter.is_armed(TimerKind::Period));
        assert_eq!(presenter.next_tick().await, TimerKind::GatePoll);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut presenter = TokioPresenter::new(true);
        let err = presenter.request_timer_start(TimerKind::Period, 0).unwrap_err();
        assert_eq!(err, ScheduleError::rejected(TimerKind::Period, "interval must be positive"));
        assert!(!presenter.is_armed(TimerKind::Period));
    }
}
