mod engine;
mod gate;
mod movement;
mod presenter;

pub use engine::{JiggleEngine, JiggleState};
pub use gate::{is_within_window, WallTime};
pub use movement::{next as next_movement, MoveSink, MoveVector, JIGGLE_AMPLITUDE};
pub use presenter::{Presenter, TimerKind, GATE_POLL_INTERVAL_MS};
