//! Jiggle state machine.
//!
//! The engine does not use internal threads or timers. It asks its
//! [`Presenter`] to arm and cancel timers, and the caller invokes the event
//! handlers (`on_period_tick`, `poll_gate`, ...) when those timers fire.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --manual start / gate open--> Active
//! Active --manual stop / gate closed / timer failure--> Idle
//! ```
//!
//! Every transition first requests the period timer start or stop and only
//! then notifies the presenter, so an observer never sees the state and the
//! timer disagree.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = JiggleEngine::new(config, presenter, sink);
//! engine.manual_start();
//! // When the period timer fires:
//! engine.on_period_tick();
//! // When the gate-poll timer fires:
//! engine.poll_gate(WallTime::now());
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::gate::{is_within_window, WallTime};
use super::movement::{self, MoveSink};
use super::presenter::{Presenter, TimerKind, GATE_POLL_INTERVAL_MS};
use crate::events::{Event, Trigger};
use crate::settings::JiggleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JiggleState {
    Idle,
    Active,
}

/// Core jiggle engine.
///
/// Sole owner and mutator of the jiggle state. Must not be re-entered: each
/// handler runs to completion before the next event is delivered.
#[derive(Debug)]
pub struct JiggleEngine<P, S> {
    config: JiggleConfig,
    state: JiggleState,
    /// Direction of the next non-zen movement, +1 or -1.
    direction_sign: i32,
    /// Whether the gate-poll timer is currently armed.
    gate_armed: bool,
    presenter: P,
    sink: S,
}

impl<P: Presenter, S: MoveSink> JiggleEngine<P, S> {
    /// Create a new engine in the `Idle` state.
    ///
    /// Arms the gate-poll timer when the restriction is enabled, then applies
    /// the launch intent: with `start_jiggling` set the engine performs a
    /// manual start before returning.
    pub fn new(config: JiggleConfig, presenter: P, sink: S) -> Self {
        let mut engine = Self {
            config,
            state: JiggleState::Idle,
            direction_sign: 1,
            gate_armed: false,
            presenter,
            sink,
        };

        if engine.config.restriction().enabled {
            engine.arm_gate();
        }

        if engine.config.start_jiggling() {
            if let Some(event) = engine.manual_start() {
                debug!(?event, "launch intent applied");
            }
        }

        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> JiggleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == JiggleState::Active
    }

    pub fn config(&self) -> &JiggleConfig {
        &self.config
    }

    pub fn direction_sign(&self) -> i32 {
        self.direction_sign
    }

    pub fn gate_armed(&self) -> bool {
        self.gate_armed
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn tooltip_text(&self) -> String {
        match self.state {
            JiggleState::Idle => "Not jiggling the mouse.".to_string(),
            JiggleState::Active => format!(
                "Jiggling mouse every {} s, {} Zen.",
                self.config.period_secs(),
                if self.config.zen_mode() { "with" } else { "without" }
            ),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            period_secs: self.config.period_secs(),
            zen_mode: self.config.zen_mode(),
            restriction_enabled: self.config.restriction().enabled,
            tooltip: self.tooltip_text(),
            at: Utc::now(),
        }
    }

    // ── Manual control ───────────────────────────────────────────────

    /// Flips Idle↔Active. Overrides the gate until its next evaluation.
    pub fn manual_toggle(&mut self) -> Option<Event> {
        match self.state {
            JiggleState::Idle => self.enter_active(Trigger::Manual),
            JiggleState::Active => self.enter_idle(Trigger::Manual),
        }
    }

    pub fn manual_start(&mut self) -> Option<Event> {
        match self.state {
            JiggleState::Idle => self.enter_active(Trigger::Manual),
            JiggleState::Active => {
                debug!("manual start ignored: already active");
                None
            }
        }
    }

    pub fn manual_stop(&mut self) -> Option<Event> {
        match self.state {
            JiggleState::Active => self.enter_idle(Trigger::Manual),
            JiggleState::Idle => {
                debug!("manual stop ignored: already idle");
                None
            }
        }
    }

    // ── Timer handlers ───────────────────────────────────────────────

    /// Pulls the state toward the gate's verdict. Level-triggered: a repeated
    /// verdict that matches the state does nothing, a mismatch is corrected
    /// on whichever tick observes it.
    ///
    /// Ignored while the restriction is disabled.
    pub fn on_automatic_gate_tick(&mut self, within_window: bool) -> Option<Event> {
        if !self.config.restriction().enabled {
            debug!("gate tick ignored: time restriction disabled");
            return None;
        }

        match (within_window, self.state) {
            (true, JiggleState::Idle) => self.enter_active(Trigger::Automatic),
            (false, JiggleState::Active) => self.enter_idle(Trigger::Automatic),
            _ => None,
        }
    }

    /// Evaluates the gate for `now` and forwards the verdict.
    pub fn poll_gate(&mut self, now: WallTime) -> Option<Event> {
        let within_window = is_within_window(now, self.config.restriction());
        self.on_automatic_gate_tick(within_window)
    }

    /// Emits the next movement. No-op while idle.
    pub fn on_period_tick(&mut self) -> Option<Event> {
        if self.state == JiggleState::Idle {
            debug!("period tick ignored: idle");
            return None;
        }

        let (vector, sign) = movement::next(&self.config, self.direction_sign);
        self.direction_sign = sign;

        if self.sink.inject_move(vector.dx, vector.dy) {
            Some(Event::Jiggled {
                dx: vector.dx,
                dy: vector.dy,
                at: Utc::now(),
            })
        } else {
            warn!(dx = vector.dx, dy = vector.dy, "failed to inject pointer movement");
            Some(Event::JiggleFailed {
                dx: vector.dx,
                dy: vector.dy,
                at: Utc::now(),
            })
        }
    }

    // ── Reconfiguration ──────────────────────────────────────────────

    /// Replaces the configuration snapshot.
    ///
    /// A new period restarts a running period timer immediately; enabling or
    /// disabling the restriction arms or cancels the gate-poll timer. The
    /// launch-only `start_jiggling` flag of `config` is ignored.
    pub fn reconfigure(&mut self, config: JiggleConfig) -> Option<Event> {
        let old = self.config;
        let new = config.with_start_jiggling(old.start_jiggling());
        if new == old {
            return None;
        }
        self.config = new;

        let restriction_enabled = new.restriction().enabled;
        if restriction_enabled && !self.gate_armed {
            self.arm_gate();
        } else if !restriction_enabled && self.gate_armed {
            self.presenter.request_timer_stop(TimerKind::GatePoll);
            self.gate_armed = false;
        }

        let period_changed = old.period_secs() != new.period_secs();
        if period_changed && self.state == JiggleState::Active {
            self.presenter.request_timer_stop(TimerKind::Period);
            if let Err(err) = self
                .presenter
                .request_timer_start(TimerKind::Period, new.period_ms())
            {
                warn!(%err, "period timer could not be re-armed; stopping");
                self.state = JiggleState::Idle;
                self.notify();
                return Some(Event::TimerRejected {
                    kind: TimerKind::Period,
                    reason: err.to_string(),
                    at: Utc::now(),
                });
            }
            info!(period_secs = new.period_secs(), "period timer restarted");
        }

        if period_changed || old.zen_mode() != new.zen_mode() {
            let text = self.tooltip_text();
            self.presenter.notify_tooltip_text_changed(&text);
        }

        Some(Event::ConfigChanged {
            period_secs: new.period_secs(),
            zen_mode: new.zen_mode(),
            restriction_enabled,
            at: Utc::now(),
        })
    }

    /// Cancels every timer. Used when the process is about to exit.
    pub fn shutdown(&mut self) -> Option<Event> {
        if self.gate_armed {
            self.presenter.request_timer_stop(TimerKind::GatePoll);
            self.gate_armed = false;
        }
        match self.state {
            JiggleState::Active => self.enter_idle(Trigger::Manual),
            JiggleState::Idle => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_active(&mut self, trigger: Trigger) -> Option<Event> {
        if let Err(err) = self
            .presenter
            .request_timer_start(TimerKind::Period, self.config.period_ms())
        {
            warn!(%err, ?trigger, "cannot start jiggling: period timer refused");
            self.state = JiggleState::Idle;
            self.notify();
            return Some(Event::TimerRejected {
                kind: TimerKind::Period,
                reason: err.to_string(),
                at: Utc::now(),
            });
        }

        self.state = JiggleState::Active;
        info!(?trigger, period_secs = self.config.period_secs(), "jiggling started");
        self.notify();
        Some(Event::JiggleStarted {
            trigger,
            period_secs: self.config.period_secs(),
            at: Utc::now(),
        })
    }

    fn enter_idle(&mut self, trigger: Trigger) -> Option<Event> {
        self.presenter.request_timer_stop(TimerKind::Period);
        self.state = JiggleState::Idle;
        info!(?trigger, "jiggling stopped");
        self.notify();
        Some(Event::JiggleStopped {
            trigger,
            at: Utc::now(),
        })
    }

    fn notify(&mut self) {
        self.presenter.notify_state_changed(self.state);
        let text = self.tooltip_text();
        self.presenter.notify_tooltip_text_changed(&text);
    }

    fn arm_gate(&mut self) {
        match self
            .presenter
            .request_timer_start(TimerKind::GatePoll, GATE_POLL_INTERVAL_MS)
        {
            Ok(()) => self.gate_armed = true,
            Err(err) => {
                warn!(%err, "gate-poll timer refused; automatic control disabled");
                self.gate_armed = false;
            }
        }
    }
}
