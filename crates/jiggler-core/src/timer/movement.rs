//! Movement generator and the injection seam.

use serde::{Deserialize, Serialize};

use crate::settings::JiggleConfig;

/// Displacement applied on each non-zen tick, on both axes.
pub const JIGGLE_AMPLITUDE: i32 = 4;

/// Relative pointer displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveVector {
    pub dx: i32,
    pub dy: i32,
}

impl MoveVector {
    pub const ZERO: MoveVector = MoveVector { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl std::ops::Add for MoveVector {
    type Output = MoveVector;

    fn add(self, rhs: MoveVector) -> MoveVector {
        MoveVector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

/// Returns the next vector and the sign to use on the following tick.
///
/// Zen mode yields `(0, 0)` and keeps the sign. Otherwise the cursor zig-zags
/// diagonally by [`JIGGLE_AMPLITUDE`], flipping direction every tick so the
/// net displacement over any even number of ticks is zero.
pub fn next(config: &JiggleConfig, prior_sign: i32) -> (MoveVector, i32) {
    if config.zen_mode() {
        return (MoveVector::ZERO, prior_sign);
    }

    let sign = if prior_sign < 0 { -1 } else { 1 };
    let delta = sign * JIGGLE_AMPLITUDE;
    (MoveVector::new(delta, delta), -sign)
}

/// The single primitive that moves the OS pointer.
///
/// Returns `false` when the movement could not be enqueued. The engine only
/// observes the failure; the next period tick is the retry.
pub trait MoveSink {
    fn inject_move(&mut self, dx: i32, dy: i32) -> bool;
}

impl<S: MoveSink + ?Sized> MoveSink for Box<S> {
    fn inject_move(&mut self, dx: i32, dy: i32) -> bool {
        (**self).inject_move(dx, dy)
    }
}
