//! Recording presenter and sink shared by the integration tests.

#![allow(dead_code)]

use jiggler_core::{JiggleState, MoveSink, Presenter, ScheduleError, TimerKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TimerStart(TimerKind, u64),
    TimerStop(TimerKind),
    StateChanged(JiggleState),
    Tooltip(String),
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<Call>,
}

impl RecordingPresenter {
    pub fn timer_starts(&self, kind: TimerKind) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::TimerStart(k, ms) if *k == kind => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn timer_stops(&self, kind: TimerKind) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::TimerStop(k) if *k == kind))
            .count()
    }

    pub fn last_tooltip(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Tooltip(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn request_timer_start(&mut self, kind: TimerKind, interval_ms: u64) -> Result<(), ScheduleError> {
        self.calls.push(Call::TimerStart(kind, interval_ms));
        Ok(())
    }

    fn request_timer_stop(&mut self, kind: TimerKind) {
        self.calls.push(Call::TimerStop(kind));
    }

    fn notify_state_changed(&mut self, state: JiggleState) {
        self.calls.push(Call::StateChanged(state));
    }

    fn notify_tooltip_text_changed(&mut self, text: &str) {
        self.calls.push(Call::Tooltip(text.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub moves: Vec<(i32, i32)>,
}

impl MoveSink for RecordingSink {
    fn inject_move(&mut self, dx: i32, dy: i32) -> bool {
        self.moves.push((dx, dy));
        true
    }
}
